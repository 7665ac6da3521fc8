//! Historical sync against a single peer: download blocks by range in
//! `MAX_BLOCKS_BY_RANGE`-sized chunks, import each one, and repeat until
//! the peer's advertised head slot is reached.

use eth2_network::{BlocksByRangeRequest, GoodbyeReason, PeerId, MAX_BLOCKS_BY_RANGE};
use types::{config::Config, primitives::Slot, types::SignedBeaconBlock};

use crate::error::SyncError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SingleSyncStatus {
    Syncing { next_slot: Slot },
    Finished,
    Cancelled,
}

/// Drives a single-peer range sync from `start_slot` up to (and
/// including) `target_slot`. Chunking and import are delegated to the
/// caller via `import_block`/`request_range` so this type stays
/// transport- and chain-state-agnostic.
pub struct SingleSync {
    peer: PeerId,
    next_slot: Slot,
    target_slot: Slot,
    cancelled: bool,
}

impl SingleSync {
    pub fn new(peer: PeerId, start_slot: Slot, target_slot: Slot) -> Self {
        Self { peer, next_slot: start_slot, target_slot, cancelled: false }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn status(&self) -> SingleSyncStatus {
        if self.cancelled {
            SingleSyncStatus::Cancelled
        } else if self.next_slot > self.target_slot {
            SingleSyncStatus::Finished
        } else {
            SingleSyncStatus::Syncing { next_slot: self.next_slot }
        }
    }

    /// The next chunk to request, or `None` if the sync is done or cancelled.
    pub fn next_request(&self) -> Option<BlocksByRangeRequest> {
        if self.cancelled || self.next_slot > self.target_slot {
            return None;
        }
        let remaining = self.target_slot - self.next_slot + 1;
        Some(BlocksByRangeRequest {
            start_slot: self.next_slot,
            count: remaining.min(MAX_BLOCKS_BY_RANGE),
            step: 1,
        })
    }

    /// Imports a received chunk in order, advancing `next_slot` past the
    /// last imported block. Stops and reports `FAULT_ERROR` on the first
    /// block that fails to import, since that traces to bad peer content.
    pub fn import_chunk<C: Config>(
        &mut self,
        blocks: Vec<SignedBeaconBlock<C>>,
        mut import_block: impl FnMut(&SignedBeaconBlock<C>) -> bool,
    ) -> Result<(), SyncError> {
        if self.cancelled {
            return Err(SyncError::Cancelled);
        }
        for block in &blocks {
            if !import_block(block) {
                return Err(SyncError::BadBlockContent(self.peer));
            }
            self.next_slot = block.message.slot + 1;
        }
        Ok(())
    }

    pub fn disconnect_reason_on_failure(&self) -> GoodbyeReason {
        GoodbyeReason::FaultError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> PeerId {
        PeerId([0_u8; 32])
    }

    #[test]
    fn finishes_once_next_slot_passes_target() {
        let sync = SingleSync::new(peer(), 5, 4);
        assert_eq!(sync.status(), SingleSyncStatus::Finished);
        assert!(sync.next_request().is_none());
    }

    #[test]
    fn next_request_is_bounded_by_max_blocks_by_range() {
        let sync = SingleSync::new(peer(), 0, MAX_BLOCKS_BY_RANGE * 3);
        let request = sync.next_request().unwrap();
        assert_eq!(request.count, MAX_BLOCKS_BY_RANGE);
    }

    #[test]
    fn cancel_stops_further_requests() {
        let mut sync = SingleSync::new(peer(), 0, 10);
        sync.cancel();
        assert_eq!(sync.status(), SingleSyncStatus::Cancelled);
        assert!(sync.next_request().is_none());
    }
}
