//! Dedup-by-fingerprint pools for the operations that are rare enough to
//! need no aggregation: slashings and voluntary exits. All three are
//! evicted wholesale once finalization makes them unneeded.

use std::collections::HashMap;

use parking_lot::RwLock;
use types::{
    config::Config,
    primitives::{Epoch, SignatureBytes, ValidatorIndex},
    types::{AttesterSlashing, BeaconBlockHeader, ProposerSlashing, SignedBeaconBlockHeader, VoluntaryExit},
};

/// Keyed by the pair of attesting-indices sets the two halves of the
/// slashing report, so the same double-vote reported twice is deduplicated.
pub struct AttesterSlashingPool<C: Config> {
    slashings: RwLock<HashMap<(Vec<ValidatorIndex>, Vec<ValidatorIndex>), AttesterSlashing<C>>>,
}

impl<C: Config> Default for AttesterSlashingPool<C> {
    fn default() -> Self {
        Self { slashings: RwLock::new(HashMap::new()) }
    }
}

impl<C: Config> AttesterSlashingPool<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, slashing: AttesterSlashing<C>) {
        let key = (
            slashing.attestation_1.attesting_indices.iter().copied().collect(),
            slashing.attestation_2.attesting_indices.iter().copied().collect(),
        );
        self.slashings.write().entry(key).or_insert(slashing);
    }

    pub fn len(&self) -> usize {
        self.slashings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain(&self) -> Vec<AttesterSlashing<C>> {
        self.slashings.write().drain().map(|(_, slashing)| slashing).collect()
    }

    /// A slashing naming an already-exited validator can never change the
    /// canonical chain again; dropped once the finalized epoch passes it.
    pub fn prune(&self, finalized_epoch: Epoch, exit_epoch_of: impl Fn(ValidatorIndex) -> Epoch) {
        self.slashings.write().retain(|(indices_1, _), _| {
            indices_1.iter().any(|&index| finalized_epoch < exit_epoch_of(index))
        });
    }
}

/// Keyed by proposer index: only one proposer slashing per proposer is
/// ever useful, since slashing the same validator twice has no additional effect.
pub struct ProposerSlashingPool {
    slashings: RwLock<HashMap<ValidatorIndex, ProposerSlashing>>,
}

impl Default for ProposerSlashingPool {
    fn default() -> Self {
        Self { slashings: RwLock::new(HashMap::new()) }
    }
}

impl ProposerSlashingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, slashing: ProposerSlashing) {
        self.slashings.write().entry(slashing.proposer_index).or_insert(slashing);
    }

    pub fn len(&self) -> usize {
        self.slashings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain(&self) -> Vec<ProposerSlashing> {
        self.slashings.write().drain().map(|(_, slashing)| slashing).collect()
    }
}

/// Keyed by the exiting validator's index: a validator can only exit once.
pub struct VoluntaryExitPool {
    exits: RwLock<HashMap<ValidatorIndex, VoluntaryExit>>,
}

impl Default for VoluntaryExitPool {
    fn default() -> Self {
        Self { exits: RwLock::new(HashMap::new()) }
    }
}

impl VoluntaryExitPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, exit: VoluntaryExit) {
        self.exits.write().entry(exit.validator_index).or_insert(exit);
    }

    pub fn len(&self) -> usize {
        self.exits.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain(&self) -> Vec<VoluntaryExit> {
        self.exits.write().drain().map(|(_, exit)| exit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposer_slashing_pool_dedups_by_proposer() {
        let pool = ProposerSlashingPool::new();
        let header = SignedBeaconBlockHeader {
            message: BeaconBlockHeader::default(),
            signature: SignatureBytes::empty(),
        };
        let mut slashing = ProposerSlashing {
            proposer_index: 4,
            signed_header_1: header.clone(),
            signed_header_2: header,
        };
        pool.insert(slashing.clone());
        slashing.signed_header_1.message.slot = 99;
        pool.insert(slashing);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn voluntary_exit_pool_dedups_by_validator() {
        let pool = VoluntaryExitPool::new();
        pool.insert(VoluntaryExit { epoch: 1, validator_index: 7 });
        pool.insert(VoluntaryExit { epoch: 2, validator_index: 7 });
        assert_eq!(pool.len(), 1);
    }
}
