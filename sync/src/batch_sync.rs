//! Multi-peer batched sync: the unsynced slot range is divided into
//! fixed-size batches, each assigned to a peer and advanced through a
//! state machine. Only a contiguous prefix of `Confirmed` batches is
//! dispatched to import; out-of-order completion of a middle batch waits
//! for its predecessor.

use std::collections::BTreeMap;

use eth2_network::PeerId;
use types::{config::Config, primitives::{H256, Slot}, types::SignedBeaconBlock};

use crate::error::SyncError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BatchState {
    AwaitingBlocks,
    BlocksReceived,
    Confirmed,
    Imported,
}

pub struct Batch<C: Config> {
    pub id: u64,
    pub start_slot: Slot,
    pub count: u64,
    pub peer: PeerId,
    pub state: BatchState,
    pub blocks: Vec<SignedBeaconBlock<C>>,
    pub contesting_peer: Option<PeerId>,
}

impl<C: Config> Batch<C> {
    fn new(id: u64, start_slot: Slot, count: u64, peer: PeerId) -> Self {
        Self {
            id,
            start_slot,
            count,
            peer,
            state: BatchState::AwaitingBlocks,
            blocks: Vec::new(),
            contesting_peer: None,
        }
    }
}

/// Divides `[start_slot, target_slot]` into fixed-size batches and drives
/// them through `AwaitingBlocks -> BlocksReceived -> Confirmed -> Imported`,
/// dispatching only a contiguous prefix of `Confirmed` batches to import.
pub struct BatchSync<C: Config> {
    batch_size: u64,
    batches: BTreeMap<u64, Batch<C>>,
    next_batch_id: u64,
    /// Id of the first batch not yet imported; the dispatch frontier.
    head: u64,
    cancelled: std::collections::HashSet<u64>,
}

impl<C: Config> BatchSync<C> {
    pub fn new(start_slot: Slot, target_slot: Slot, batch_size: u64, peers: &[PeerId]) -> Self {
        let mut batches = BTreeMap::new();
        let mut id = 0;
        let mut slot = start_slot;
        let mut peer_cursor = 0;
        while slot <= target_slot && !peers.is_empty() {
            let count = batch_size.min(target_slot - slot + 1);
            let peer = peers[peer_cursor % peers.len()];
            batches.insert(id, Batch::new(id, slot, count, peer));
            slot += count;
            id += 1;
            peer_cursor += 1;
        }
        Self { batch_size, batches, next_batch_id: id, head: 0, cancelled: Default::default() }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Cancels a single batch; its in-flight request is allowed to
    /// complete but the result is discarded.
    pub fn cancel_batch(&mut self, id: u64) {
        self.cancelled.insert(id);
    }

    pub fn receive_blocks(&mut self, id: u64, blocks: Vec<SignedBeaconBlock<C>>) {
        if self.cancelled.contains(&id) {
            return;
        }
        if let Some(batch) = self.batches.get_mut(&id) {
            batch.blocks = blocks;
            batch.state = BatchState::BlocksReceived;
        }
    }

    /// Confirms a batch whose first block's parent matches the previous
    /// batch's last block and whose last block is the parent of the next
    /// batch's first block. A batch with no predecessor/successor to
    /// check against (the chain's first or last batch) confirms on receipt.
    pub fn try_confirm(&mut self, id: u64) -> Result<(), SyncError> {
        let prev_last_root = self.batches.get(&id.wrapping_sub(1)).and_then(last_block_root);
        let next_first_parent = self.batches.get(&(id + 1)).and_then(first_block_parent);

        let batch = self.batches.get_mut(&id).ok_or(SyncError::NoPeerAvailable(id))?;
        if batch.state != BatchState::BlocksReceived {
            return Ok(());
        }

        let links_to_prev = match (prev_last_root, batch.blocks.first()) {
            (Some(prev_root), Some(first)) => first.message.parent_root == prev_root,
            (None, _) => true,
            (Some(_), None) => false,
        };
        let links_to_next = match (batch.blocks.last(), next_first_parent) {
            (Some(last), Some(next_parent)) => next_parent == block_root(last),
            (_, None) => true,
            (None, Some(_)) => false,
        };

        if links_to_prev && links_to_next {
            batch.state = BatchState::Confirmed;
            Ok(())
        } else {
            batch.contesting_peer = Some(batch.peer);
            Err(SyncError::BatchContested(id))
        }
    }

    /// Reassigns a contested batch to a third peer for arbitration; the
    /// dissenting original peer is the caller's responsibility to penalize.
    pub fn arbitrate(&mut self, id: u64, third_peer: PeerId) {
        if let Some(batch) = self.batches.get_mut(&id) {
            batch.peer = third_peer;
            batch.state = BatchState::AwaitingBlocks;
            batch.blocks.clear();
            batch.contesting_peer = None;
        }
    }

    /// Pops and returns the contiguous prefix of `Confirmed` batches
    /// starting at the dispatch frontier, marking them `Imported`.
    pub fn dispatch_ready_prefix(&mut self) -> Vec<Batch<C>> {
        let mut ready = Vec::new();
        while let Some(batch) = self.batches.get(&self.head) {
            if batch.state != BatchState::Confirmed {
                break;
            }
            let mut batch = self.batches.remove(&self.head).unwrap();
            batch.state = BatchState::Imported;
            ready.push(batch);
            self.head += 1;
        }
        ready
    }

    pub fn is_complete(&self) -> bool {
        self.head >= self.next_batch_id
    }
}

fn last_block_root<C: Config>(batch: &Batch<C>) -> Option<H256> {
    batch.blocks.last().map(block_root)
}

fn first_block_parent<C: Config>(batch: &Batch<C>) -> Option<H256> {
    batch.blocks.first().map(|block| block.message.parent_root)
}

fn block_root<C: Config>(block: &SignedBeaconBlock<C>) -> H256 {
    helper_functions::crypto::hash_tree_root(&block.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MainnetConfig;

    fn peer(byte: u8) -> PeerId {
        PeerId([byte; 32])
    }

    #[test]
    fn batches_are_sized_and_assigned_round_robin() {
        let peers = [peer(1), peer(2)];
        let sync: BatchSync<MainnetConfig> = BatchSync::new(0, 19, 10, &peers);
        assert_eq!(sync.batches.len(), 2);
        assert_eq!(sync.batches[&0].peer, peer(1));
        assert_eq!(sync.batches[&1].peer, peer(2));
    }

    #[test]
    fn first_batch_confirms_without_a_predecessor_link() {
        let peers = [peer(1)];
        let mut sync: BatchSync<MainnetConfig> = BatchSync::new(0, 9, 10, &peers);
        sync.receive_blocks(0, vec![]);
        assert!(sync.try_confirm(0).is_ok());
        assert_eq!(sync.batches[&0].state, BatchState::Confirmed);
    }

    #[test]
    fn dispatch_only_releases_contiguous_confirmed_prefix() {
        let peers = [peer(1)];
        let mut sync: BatchSync<MainnetConfig> = BatchSync::new(0, 29, 10, &peers);
        sync.receive_blocks(1, vec![]);
        let _ = sync.try_confirm(1);
        assert!(sync.dispatch_ready_prefix().is_empty());

        sync.receive_blocks(0, vec![]);
        let _ = sync.try_confirm(0);
        let ready = sync.dispatch_ready_prefix();
        assert_eq!(ready.len(), 2);
    }
}
