//! Aggregates incoming attestations by `AttestationData`, merging
//! non-overlapping attestations into wider aggregates via BLS signature
//! aggregation and aggregation-bit union, the way a gossiping attestation
//! aggregator must.

use std::collections::HashMap;

use bls::AggregateSignature;
use parking_lot::RwLock;
use typenum::marker_traits::Unsigned;
use types::{config::Config, primitives::SignatureBytes, primitives::Slot, types::Attestation};

/// Two attestations for the same `AttestationData` can be merged only if
/// no validator index is set in both aggregation bit-lists.
fn signers_disjoint_from<C: Config>(a: &Attestation<C>, b: &Attestation<C>) -> bool {
    let len = a.aggregation_bits.len().max(b.aggregation_bits.len());
    (0..len).all(|i| {
        let in_a = a.aggregation_bits.get(i).unwrap_or(false);
        let in_b = b.aggregation_bits.get(i).unwrap_or(false);
        !(in_a && in_b)
    })
}

/// Merges `other` into `existing` in place, unioning the aggregation bits
/// and re-aggregating the BLS signature.
fn aggregate_into<C: Config>(existing: &mut Attestation<C>, other: &Attestation<C>) {
    let len = existing
        .aggregation_bits
        .len()
        .max(other.aggregation_bits.len());
    for i in 0..len {
        if other.aggregation_bits.get(i).unwrap_or(false) {
            let _ = existing.aggregation_bits.set(i, true);
        }
    }

    let existing_sig = existing
        .signature
        .try_into_signature()
        .expect("pooled attestation signature bytes were already verified at gossip ingress");
    let other_sig = other
        .signature
        .try_into_signature()
        .expect("pooled attestation signature bytes were already verified at gossip ingress");
    let aggregate = AggregateSignature::from_signatures(&[existing_sig, other_sig]);
    let mut bytes = [0_u8; 96];
    bytes.copy_from_slice(&aggregate.as_bytes());
    existing.signature = SignatureBytes::from(bytes);
}

/// Pool of attestations awaiting inclusion in a block, keyed by their
/// `AttestationData` so identical-vote attestations aggregate together.
pub struct AttestationPool<C: Config> {
    attestations: RwLock<HashMap<types::types::AttestationData, Vec<Attestation<C>>>>,
}

impl<C: Config> Default for AttestationPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> AttestationPool<C> {
    pub fn new() -> Self {
        Self { attestations: RwLock::new(HashMap::new()) }
    }

    /// Inserts a validated attestation, aggregating it with an existing
    /// disjoint-signer bucket entry when possible.
    pub fn insert(&self, attestation: Attestation<C>) {
        let mut pool = self.attestations.write();
        let bucket = pool.entry(attestation.data.clone()).or_default();

        for existing in bucket.iter_mut() {
            if signers_disjoint_from(existing, &attestation) {
                aggregate_into(existing, &attestation);
                return;
            }
            if *existing == attestation {
                return;
            }
        }
        bucket.push(attestation);
    }

    pub fn num_attestations(&self) -> usize {
        self.attestations.read().values().map(Vec::len).sum()
    }

    /// Returns attestations for inclusion in a block proposed at `slot`,
    /// bounded by `MaxAttestations` and by the minimum attestation
    /// inclusion delay.
    pub fn get_aggregates_for_block(&self, slot: Slot) -> Vec<Attestation<C>> {
        let min_delay = C::min_attestation_inclusion_delay();
        let max = C::MaxAttestations::to_usize();
        self.attestations
            .read()
            .values()
            .flatten()
            .filter(|attestation| attestation.data.slot + min_delay <= slot)
            .take(max)
            .cloned()
            .collect()
    }

    /// Drops attestations that can no longer be included: the finalized
    /// state has already moved two epochs past their target.
    pub fn prune(&self, finalized_epoch: types::primitives::Epoch) {
        self.attestations
            .write()
            .retain(|data, _| finalized_epoch <= data.target.epoch + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MainnetConfig;
    use types::types::{AttestationData, Checkpoint};

    fn data(slot: Slot) -> AttestationData {
        AttestationData {
            slot,
            index: 0,
            beacon_block_root: Default::default(),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    #[test]
    fn duplicate_attestation_is_not_double_counted() {
        let pool: AttestationPool<MainnetConfig> = AttestationPool::new();
        let attestation = Attestation {
            aggregation_bits: ssz_types::BitList::with_capacity(4).unwrap(),
            data: data(1),
            signature: SignatureBytes::empty(),
        };
        pool.insert(attestation.clone());
        pool.insert(attestation);
        assert_eq!(pool.num_attestations(), 1);
    }

    #[test]
    fn prune_drops_attestations_two_epochs_stale() {
        let pool: AttestationPool<MainnetConfig> = AttestationPool::new();
        let mut old = data(1);
        old.target.epoch = 0;
        pool.insert(Attestation {
            aggregation_bits: ssz_types::BitList::with_capacity(4).unwrap(),
            data: old,
            signature: SignatureBytes::empty(),
        });
        pool.prune(5);
        assert_eq!(pool.num_attestations(), 0);
    }
}
