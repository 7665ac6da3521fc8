//! Per-epoch duty computation: which slot and committee a managed
//! validator attests in, and which slot (if any) it proposes.

use helper_functions::{
    beacon_state_accessors::{get_beacon_committee, get_beacon_proposer_index, get_committee_count_at_slot},
    misc::compute_start_slot_of_epoch,
};
use ssz_types::VariableList;
use types::{
    beacon_state::BeaconState,
    config::Config,
    primitives::{CommitteeIndex, Epoch, Slot, ValidatorIndex},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AttestationDuty {
    pub slot: Slot,
    pub committee_index: CommitteeIndex,
    pub validator_index: ValidatorIndex,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProposerDuty {
    pub slot: Slot,
    pub validator_index: ValidatorIndex,
}

/// Finds the single slot and committee at which `validator_index` attests
/// during `epoch`, by scanning every committee of every slot in the
/// epoch — there is exactly one, by the committee-assignment invariant.
pub fn compute_attestation_duty<C: Config>(
    state: &BeaconState<C>,
    epoch: Epoch,
    validator_index: ValidatorIndex,
) -> Option<AttestationDuty> {
    let start_slot = compute_start_slot_of_epoch::<C>(epoch);
    for slot in start_slot..start_slot + C::slots_per_epoch() {
        let committee_count = get_committee_count_at_slot(state, slot).ok()?;
        for committee_index in 0..committee_count {
            let committee = get_beacon_committee(state, slot, committee_index).ok()?;
            if committee.contains(&validator_index) {
                return Some(AttestationDuty { slot, committee_index, validator_index });
            }
        }
    }
    None
}

/// Finds every slot in `epoch` at which `validator_index` is the
/// proposer. `state` must already be advanced (via `process_slots`) to
/// each candidate slot in turn, since the proposer index is a function of
/// the state's own slot and RANDAO mix — the caller supplies one state
/// per slot via `state_at_slot`.
pub fn compute_proposer_duties<C: Config>(
    epoch: Epoch,
    managed_validators: &[ValidatorIndex],
    mut state_at_slot: impl FnMut(Slot) -> BeaconState<C>,
) -> Vec<ProposerDuty> {
    let start_slot = compute_start_slot_of_epoch::<C>(epoch);
    let mut duties = Vec::new();
    for slot in start_slot..start_slot + C::slots_per_epoch() {
        let state = state_at_slot(slot);
        if let Ok(proposer_index) = get_beacon_proposer_index(&state) {
            if managed_validators.contains(&proposer_index) {
                duties.push(ProposerDuty { slot, validator_index: proposer_index });
            }
        }
    }
    duties
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MinimalConfig;

    #[test]
    fn attestation_duty_assigns_every_active_validator_exactly_once() {
        let mut state = BeaconState::<MinimalConfig>::default();
        let validators: Vec<_> = (0..16)
            .map(|_| types::types::Validator {
                effective_balance: MinimalConfig::max_effective_balance(),
                ..Default::default()
            })
            .collect();
        let balances: Vec<_> = (0..16).map(|_| MinimalConfig::max_effective_balance()).collect();
        state.validators = VariableList::from(validators);
        state.balances = VariableList::from(balances);

        let duties: Vec<_> = (0..16)
            .filter_map(|index| compute_attestation_duty(&state, 0, index))
            .collect();
        assert_eq!(duties.len(), 16);
    }
}
