use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitVector, FixedVector, VariableList};
use std::cmp;
use std::convert::TryFrom;
use tree_hash_derive::TreeHash;
use typenum::marker_traits::Unsigned;

use crate::{config::Config, config::MainnetConfig, consts, error::Error, primitives::*, types::*};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash, Default)]
pub struct BeaconState<C: Config> {
    pub genesis_time: UnixSeconds,
    pub slot: Slot,
    pub fork: Fork,

    // History
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<H256, C::HistoricalRootsLimit>,

    // Eth1 data
    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,

    // Registry
    pub validators: VariableList<Validator, C::ValidatorRegistryLimit>,
    pub balances: VariableList<Gwei, C::ValidatorRegistryLimit>,

    // Randomness
    pub randao_mixes: FixedVector<H256, C::EpochsPerHistoricalVector>,

    // Slashings
    pub slashings: FixedVector<Gwei, C::EpochsPerSlashingsVector>,

    // Attestations
    pub previous_epoch_attestations:
        VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>,
    pub current_epoch_attestations: VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>,

    // Finality
    pub justification_bits: BitVector<consts::JustificationBitsLength>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
}

impl<C: Config> BeaconState<C> {
    pub fn compute_activation_exit_epoch(&self, epoch: Epoch) -> Epoch {
        epoch + 1 + C::activation_exit_delay()
    }

    pub fn get_block_root_at_slot(&self, slot: Slot) -> Result<H256, Error> {
        if !(slot < self.slot && self.slot <= slot + C::SlotsPerHistoricalRoot::to_u64()) {
            return Err(Error::SlotOutOfRange);
        }

        match usize::try_from(slot % C::SlotsPerHistoricalRoot::to_u64()) {
            Err(_err) => Err(Error::IndexOutOfRange),
            Ok(id) => Ok(self.block_roots[id]),
        }
    }

    pub fn get_block_root(&self, epoch: Epoch) -> Result<H256, Error> {
        self.get_block_root_at_slot(self.compute_start_slot_of_epoch(epoch))
    }

    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        let mut active_validator_indices = Vec::new();
        for (i, v) in self.validators.iter().enumerate() {
            if v.is_active(epoch) {
                active_validator_indices.push(i as u64);
            }
        }
        active_validator_indices
    }

    pub fn increase_balance(&mut self, index: ValidatorIndex, delta: Gwei) {
        if let Ok(id) = usize::try_from(index) {
            self.balances[id] += delta;
        }
    }

    pub fn decrease_balance(&mut self, index: ValidatorIndex, delta: Gwei) {
        if let Ok(id) = usize::try_from(index) {
            self.balances[id] = self.balances[id].saturating_sub(delta);
        }
    }

    pub fn get_current_epoch(&self) -> Epoch {
        self.slot / C::SlotsPerEpoch::to_u64()
    }

    pub fn get_previous_epoch(&self) -> Epoch {
        let current_epoch = self.get_current_epoch();
        let genesis_epoch = C::genesis_epoch();

        if current_epoch > genesis_epoch {
            current_epoch - 1
        } else {
            genesis_epoch
        }
    }

    pub fn get_randao_mix(&self, epoch: Epoch) -> Result<H256, Error> {
        match usize::try_from(epoch) {
            Err(_err) => Err(Error::IndexOutOfRange),
            Ok(id) => Ok(self.randao_mixes[id % C::EpochsPerHistoricalVector::to_usize()]),
        }
    }

    pub fn get_validator_churn_limit(&self) -> Result<u64, Error> {
        let active_validator_indices = self.get_active_validator_indices(self.get_current_epoch());

        Ok(cmp::max(
            C::min_per_epoch_churn_limit(),
            active_validator_indices.len() as u64 / C::churn_limit_quotient(),
        ))
    }

    /// Number of beacon committees active across the whole of `epoch`, per
    /// the `max(1, min(max_committees_per_slot, active // slots_per_epoch //
    /// target_committee_size)) * slots_per_epoch` rule (independent of the
    /// shard-count notion the committee count was originally defined against).
    pub fn get_committee_count(&self, epoch: Epoch) -> Result<u64, Error> {
        let active_validator_count = self.get_active_validator_indices(epoch).len() as u64;
        let committees_per_slot = cmp::max(
            1,
            cmp::min(
                C::max_committees_per_slot(),
                active_validator_count / C::SlotsPerEpoch::to_u64() / C::target_committee_size(),
            ),
        );

        Ok(committees_per_slot * C::SlotsPerEpoch::to_u64())
    }

    pub fn get_total_balance(&self, indices: &[ValidatorIndex]) -> Result<Gwei, Error> {
        let mut sum = 0;
        for index in indices {
            match usize::try_from(*index) {
                Err(_err) => return Err(Error::IndexOutOfRange),
                Ok(id) => sum += self.validators[id].effective_balance,
            }
        }
        Ok(sum)
    }

    pub fn get_total_active_balance(&self) -> Result<Gwei, Error> {
        self.get_total_balance(&self.get_active_validator_indices(self.get_current_epoch()))
    }

    pub fn compute_start_slot_of_epoch(&self, epoch: Epoch) -> Slot {
        epoch * C::SlotsPerEpoch::to_u64()
    }
}
