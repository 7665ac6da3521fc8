//! Hot/finalized split over a `KeyValueStore`, atomic `StorageUpdate`
//! application, and state regeneration by ancestry walk + block replay.

use std::collections::HashMap;
use std::sync::Arc;

use ssz::{Decode, Encode};
use types::{
    beacon_state::BeaconState,
    config::Config,
    primitives::{Slot, H256},
    types::{Checkpoint, SignedBeaconBlock},
};

use crate::key_spaces::{CheckpointKind, BLOCK_BY_ROOT, BLOCK_BY_SLOT, CHECKPOINT, INITIAL_STATE, STATE_BY_BLOCK_ROOT};
use crate::key_value_store::{KeyValueStore, WriteOp};

/// Whether finalized states are kept at a fixed period (for later
/// regeneration of any intermediate state) or only the newest is retained.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StateStorageMode {
    Archive { period_slots: Slot },
    Prune,
}

/// The single atomic transaction the import pipeline emits per imported
/// block: new hot content, updated fork-choice bookkeeping, and the
/// consequences of any finalization advance, applied together.
#[derive(Default)]
pub struct StorageUpdate<C: Config> {
    pub new_hot_blocks: Vec<(H256, SignedBeaconBlock<C>)>,
    pub new_hot_state: Option<(H256, BeaconState<C>)>,
    pub vote_changes: Vec<(u64, H256)>,
    pub justified_checkpoint: Option<Checkpoint>,
    pub best_justified_checkpoint: Option<Checkpoint>,
    pub finalized_checkpoint: Option<Checkpoint>,
    pub newly_finalized_blocks: Vec<(Slot, H256, SignedBeaconBlock<C>)>,
    pub deleted_hot_block_roots: Vec<H256>,
}

impl<C: Config> StorageUpdate<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct BeaconStore<C: Config, S: KeyValueStore> {
    db: Arc<S>,
    mode: StateStorageMode,
    _marker: std::marker::PhantomData<C>,
}

impl<C: Config, S: KeyValueStore> BeaconStore<C, S> {
    pub fn new(db: Arc<S>, mode: StateStorageMode) -> Self {
        Self { db, mode, _marker: std::marker::PhantomData }
    }

    pub fn store_initial_state(&self, state: &BeaconState<C>) {
        self.db.put(INITIAL_STATE, b"", &state.as_ssz_bytes());
    }

    pub fn initial_state(&self) -> Option<BeaconState<C>> {
        self.db
            .get(INITIAL_STATE, b"")
            .and_then(|bytes| BeaconState::from_ssz_bytes(&bytes).ok())
    }

    pub fn block(&self, root: H256) -> Option<SignedBeaconBlock<C>> {
        self.db
            .get(BLOCK_BY_ROOT, root.as_bytes())
            .and_then(|bytes| SignedBeaconBlock::from_ssz_bytes(&bytes).ok())
    }

    pub fn finalized_block_at_slot(&self, slot: Slot) -> Option<SignedBeaconBlock<C>> {
        self.db
            .get(BLOCK_BY_SLOT, &slot.to_le_bytes())
            .and_then(|bytes| SignedBeaconBlock::from_ssz_bytes(&bytes).ok())
    }

    pub fn state(&self, block_root: H256) -> Option<BeaconState<C>> {
        self.db
            .get(STATE_BY_BLOCK_ROOT, block_root.as_bytes())
            .and_then(|bytes| BeaconState::from_ssz_bytes(&bytes).ok())
    }

    pub fn checkpoint(&self, kind: CheckpointKind) -> Option<Checkpoint> {
        self.db
            .get(CHECKPOINT, kind.key())
            .and_then(|bytes| Checkpoint::from_ssz_bytes(&bytes).ok())
    }

    /// Whether a finalized state is retained for `slot` under the current
    /// storage mode.
    fn retains_state_at(&self, slot: Slot) -> bool {
        match self.mode {
            StateStorageMode::Archive { period_slots } => period_slots == 0 || slot % period_slots == 0,
            StateStorageMode::Prune => false,
        }
    }

    /// Applies a `StorageUpdate` as a single atomic batch: new hot blocks
    /// and state, vote-tracker changes, checkpoint advances, and the
    /// promotion of newly finalized blocks together with the deletion of
    /// blocks a finalization advance has orphaned.
    pub fn apply_update(&self, update: StorageUpdate<C>) {
        let mut batch = Vec::new();

        for (root, block) in &update.new_hot_blocks {
            batch.push(WriteOp::Put {
                column: BLOCK_BY_ROOT,
                key: root.as_bytes().to_vec(),
                value: block.as_ssz_bytes(),
            });
        }

        if let Some((root, state)) = &update.new_hot_state {
            batch.push(WriteOp::Put {
                column: STATE_BY_BLOCK_ROOT,
                key: root.as_bytes().to_vec(),
                value: state.as_ssz_bytes(),
            });
        }

        for (validator_index, target_root) in &update.vote_changes {
            batch.push(WriteOp::Put {
                column: crate::key_spaces::VOTE_TRACKER,
                key: validator_index.to_le_bytes().to_vec(),
                value: target_root.as_bytes().to_vec(),
            });
        }

        if let Some(checkpoint) = &update.justified_checkpoint {
            batch.push(WriteOp::Put {
                column: CHECKPOINT,
                key: CheckpointKind::Justified.key().to_vec(),
                value: checkpoint.as_ssz_bytes(),
            });
        }
        if let Some(checkpoint) = &update.best_justified_checkpoint {
            batch.push(WriteOp::Put {
                column: CHECKPOINT,
                key: CheckpointKind::BestJustified.key().to_vec(),
                value: checkpoint.as_ssz_bytes(),
            });
        }
        if let Some(checkpoint) = &update.finalized_checkpoint {
            batch.push(WriteOp::Put {
                column: CHECKPOINT,
                key: CheckpointKind::Finalized.key().to_vec(),
                value: checkpoint.as_ssz_bytes(),
            });
        }

        for (slot, root, block) in &update.newly_finalized_blocks {
            batch.push(WriteOp::Put {
                column: BLOCK_BY_SLOT,
                key: slot.to_le_bytes().to_vec(),
                value: block.as_ssz_bytes(),
            });
            if !self.retains_state_at(*slot) {
                batch.push(WriteOp::Delete { column: STATE_BY_BLOCK_ROOT, key: root.as_bytes().to_vec() });
            }
        }

        for root in &update.deleted_hot_block_roots {
            batch.push(WriteOp::Delete { column: BLOCK_BY_ROOT, key: root.as_bytes().to_vec() });
            batch.push(WriteOp::Delete { column: STATE_BY_BLOCK_ROOT, key: root.as_bytes().to_vec() });
        }

        self.db.write_batch(batch);
    }

    /// Regenerates the post-state at `target_root` by walking its
    /// ancestry back to the nearest stored state and replaying blocks
    /// forward through `process_block`. `ancestry` maps a block root to
    /// its `(parent_root, block)`. Uses the identical state-transition
    /// codepath as import, so regeneration is bit-identical to having kept
    /// the state around.
    pub fn regenerate_state(
        &self,
        target_root: H256,
        ancestry: &HashMap<H256, (H256, SignedBeaconBlock<C>)>,
    ) -> Option<BeaconState<C>> {
        if let Some(state) = self.state(target_root) {
            return Some(state);
        }

        let mut chain = Vec::new();
        let mut cursor = target_root;
        let mut nearest_state = None;
        loop {
            if let Some(state) = self.state(cursor) {
                nearest_state = Some(state);
                break;
            }
            let (parent_root, block) = ancestry.get(&cursor)?;
            chain.push(block.clone());
            cursor = *parent_root;
            if cursor == H256::zero() && self.state(cursor).is_none() {
                nearest_state = self.initial_state();
                break;
            }
        }

        let mut state = nearest_state?;
        for block in chain.into_iter().rev() {
            transition_functions::process_slot::process_slots(&mut state, block.message.slot);
            transition_functions::block_processing::process_block(&mut state, &block.message);
        }
        Some(state)
    }
}
