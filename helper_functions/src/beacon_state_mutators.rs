use std::cmp;
use std::convert::TryFrom;

use typenum::marker_traits::Unsigned;
use types::{beacon_state::BeaconState, config::Config, primitives::*};

use crate::{
    beacon_state_accessors::{get_beacon_proposer_index, get_current_epoch, get_validator_churn_limit},
    error::Error,
    misc::compute_activation_exit_epoch,
};

pub fn increase_balance<C: Config>(state: &mut BeaconState<C>, index: ValidatorIndex, delta: Gwei) {
    if let Ok(id) = usize::try_from(index) {
        state.balances[id] += delta;
    }
}

pub fn decrease_balance<C: Config>(state: &mut BeaconState<C>, index: ValidatorIndex, delta: Gwei) {
    if let Ok(id) = usize::try_from(index) {
        state.balances[id] = state.balances[id].saturating_sub(delta);
    }
}

/// Queues a validator for exit, pushing the exit epoch out by one more
/// epoch than the last-assigned one whenever this epoch's exit churn is
/// already at `get_validator_churn_limit`.
pub fn initiate_validator_exit<C: Config>(
    state: &mut BeaconState<C>,
    index: ValidatorIndex,
) -> Result<(), Error> {
    let id = usize::try_from(index).map_err(|_| Error::ConversionToUsize)?;

    if state.validators[id].exit_epoch != C::far_future_epoch() {
        return Ok(());
    }

    let mut exit_epochs: Vec<Epoch> = state
        .validators
        .iter()
        .map(|validator| validator.exit_epoch)
        .filter(|&epoch| epoch != C::far_future_epoch())
        .collect();
    exit_epochs.push(compute_activation_exit_epoch::<C>(get_current_epoch(state)));

    let mut exit_queue_epoch = *exit_epochs.iter().max().expect("just pushed one element");
    let exit_queue_churn = state
        .validators
        .iter()
        .filter(|validator| validator.exit_epoch == exit_queue_epoch)
        .count() as u64;

    if exit_queue_churn >= get_validator_churn_limit(state)? {
        exit_queue_epoch += 1;
    }

    state.validators[id].exit_epoch = exit_queue_epoch;
    state.validators[id].withdrawable_epoch =
        exit_queue_epoch + C::min_validator_withdrawability_delay();

    Ok(())
}

/// Slashes a validator: queues exit, marks `slashed`, applies the
/// immediate and deferred slashing penalties, and rewards the proposer and
/// whistleblower (which default to the same validator when no
/// whistleblower is named).
pub fn slash_validator<C: Config>(
    state: &mut BeaconState<C>,
    slashed_index: ValidatorIndex,
    whistleblower_index: Option<ValidatorIndex>,
) -> Result<(), Error> {
    let epoch = get_current_epoch(state);
    initiate_validator_exit(state, slashed_index)?;

    let id = usize::try_from(slashed_index).map_err(|_| Error::ConversionToUsize)?;
    state.validators[id].slashed = true;
    state.validators[id].withdrawable_epoch = cmp::max(
        state.validators[id].withdrawable_epoch,
        epoch + C::EpochsPerSlashingsVector::to_u64(),
    );

    let slashings_index = (epoch % C::EpochsPerSlashingsVector::to_u64()) as usize;
    let effective_balance = state.validators[id].effective_balance;
    state.slashings[slashings_index] += effective_balance;
    decrease_balance(
        state,
        slashed_index,
        effective_balance / C::min_slashing_penalty_quotient(),
    );

    let proposer_index = get_beacon_proposer_index(state)?;
    let whistleblower_index = whistleblower_index.unwrap_or(proposer_index);
    let whistleblower_reward = effective_balance / C::whistleblower_reward_quotient();
    let proposer_reward = whistleblower_reward / C::proposer_reward_quotient();
    increase_balance(state, proposer_index, proposer_reward);
    increase_balance(state, whistleblower_index, whistleblower_reward - proposer_reward);

    Ok(())
}
