use crate::block_processing::process_block;
use crate::epochs::process_epoch::process_epoch;
use helper_functions::crypto::{hash_tree_root, signed_root};
use types::{
    beacon_state::BeaconState,
    config::Config,
    primitives::{Slot, H256},
    types::BeaconBlock,
};

pub fn state_transition<T: Config>(
    state: &mut BeaconState<T>,
    block: &BeaconBlock<T>,
    validate_state_root: bool,
) -> BeaconState<T> {
    process_slots(state, block.slot);
    process_block(state, block);
    if validate_state_root {
        assert!(block.state_root == hash_tree_root(state));
    }
    state.clone()
}

pub fn process_slots<T: Config>(state: &mut BeaconState<T>, slot: Slot) {
    assert!(state.slot <= slot);
    while state.slot < slot {
        process_slot(state);
        if (state.slot + 1) % T::slots_per_epoch() == 0 {
            process_epoch(state);
        }
        state.slot += 1;
    }
}

fn process_slot<T: Config>(state: &mut BeaconState<T>) {
    let previous_state_root = hash_tree_root(state);

    state.state_roots[(state.slot as usize) % (T::slots_per_historical_root() as usize)] =
        previous_state_root;

    if state.latest_block_header.state_root == H256::from([0_u8; 32]) {
        state.latest_block_header.state_root = previous_state_root;
    }

    let previous_block_root = signed_root(&state.latest_block_header);
    state.block_roots[(state.slot as usize) % (T::slots_per_historical_root() as usize)] =
        previous_block_root;
}
