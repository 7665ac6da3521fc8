//! Canonical key spaces, one `Column` per concern so the same
//! `KeyValueStore` can back blocks, states, and fork-choice bookkeeping
//! without key collisions.

use crate::key_value_store::Column;

pub const BLOCK_BY_ROOT: Column = "block_by_root";
/// Finalized blocks only — hot blocks are looked up by root, never by slot.
pub const BLOCK_BY_SLOT: Column = "block_by_slot";
pub const STATE_BY_BLOCK_ROOT: Column = "state_by_block_root";
/// Singleton per checkpoint kind: justified, best-justified, finalized.
pub const CHECKPOINT: Column = "checkpoint";
pub const VOTE_TRACKER: Column = "vote_tracker";
pub const PROTO_ARRAY_SNAPSHOT: Column = "proto_array_snapshot";
/// Written exactly once, at genesis.
pub const INITIAL_STATE: Column = "initial_state";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CheckpointKind {
    Justified,
    BestJustified,
    Finalized,
}

impl CheckpointKind {
    pub fn key(self) -> &'static [u8] {
        match self {
            Self::Justified => b"justified",
            Self::BestJustified => b"best_justified",
            Self::Finalized => b"finalized",
        }
    }
}
