//! Blocks received before their parent, keyed by the missing parent root
//! so the import pipeline can release them once that parent arrives.
//! Bounded by `MAX_PENDING_BLOCKS`; oldest entry is evicted first.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use types::{config::Config, consts::MAX_PENDING_BLOCKS, primitives::H256, types::SignedBeaconBlock};

struct Inner<C: Config> {
    by_parent: HashMap<H256, Vec<SignedBeaconBlock<C>>>,
    insertion_order: VecDeque<H256>,
    len: usize,
}

pub struct PendingBlockPool<C: Config> {
    inner: RwLock<Inner<C>>,
}

impl<C: Config> Default for PendingBlockPool<C> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_parent: HashMap::new(),
                insertion_order: VecDeque::new(),
                len: 0,
            }),
        }
    }
}

impl<C: Config> PendingBlockPool<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `block` until its parent is imported. Evicts the oldest
    /// queued block first if the pool is at `MAX_PENDING_BLOCKS`.
    pub fn insert(&self, missing_parent: H256, block: SignedBeaconBlock<C>) {
        let mut inner = self.inner.write();
        if inner.len >= MAX_PENDING_BLOCKS {
            if let Some(oldest_parent) = inner.insertion_order.pop_front() {
                if let Some(bucket) = inner.by_parent.get_mut(&oldest_parent) {
                    if !bucket.is_empty() {
                        bucket.remove(0);
                        inner.len -= 1;
                    }
                    if bucket.is_empty() {
                        inner.by_parent.remove(&oldest_parent);
                    }
                }
            }
        }
        inner.by_parent.entry(missing_parent).or_default().push(block);
        inner.insertion_order.push_back(missing_parent);
        inner.len += 1;
    }

    /// Releases every block that was waiting on `parent_root`, for
    /// recursive import now that the parent is available.
    pub fn take_children_of(&self, parent_root: H256) -> Vec<SignedBeaconBlock<C>> {
        let mut inner = self.inner.write();
        let released = inner.by_parent.remove(&parent_root).unwrap_or_default();
        inner.len -= released.len();
        released
    }

    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
