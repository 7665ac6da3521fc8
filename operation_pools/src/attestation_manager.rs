//! Defers attestations that arrive too early: either for a future slot
//! (released by `on_slot`) or naming a block this node has not yet
//! imported (released by `on_imported_block`). An attestation lives in
//! exactly one of the two queues at a time.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use types::{config::Config, consts::MAX_PENDING_ATTESTATIONS, primitives::H256, primitives::Slot, types::Attestation};

struct Inner<C: Config> {
    future_by_slot: BTreeMap<Slot, Vec<Attestation<C>>>,
    pending_by_root: HashMap<H256, Vec<Attestation<C>>>,
    pending_len: usize,
}

pub struct AttestationManager<C: Config> {
    inner: RwLock<Inner<C>>,
}

impl<C: Config> Default for AttestationManager<C> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                future_by_slot: BTreeMap::new(),
                pending_by_root: HashMap::new(),
                pending_len: 0,
            }),
        }
    }
}

impl<C: Config> AttestationManager<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an attestation for a slot that has not started yet.
    pub fn queue_future(&self, attestation: Attestation<C>) {
        let slot = attestation.data.slot;
        self.inner.write().future_by_slot.entry(slot).or_default().push(attestation);
    }

    /// Queues an attestation naming a block root this node has not yet
    /// imported, bounded by `MAX_PENDING_ATTESTATIONS` (oldest root's
    /// bucket is dropped first once full).
    pub fn queue_pending(&self, beacon_block_root: H256, attestation: Attestation<C>) {
        let mut inner = self.inner.write();
        if inner.pending_len >= MAX_PENDING_ATTESTATIONS {
            if let Some(&any_root) = inner.pending_by_root.keys().next() {
                if let Some(bucket) = inner.pending_by_root.remove(&any_root) {
                    inner.pending_len -= bucket.len();
                }
            }
        }
        inner.pending_by_root.entry(beacon_block_root).or_default().push(attestation);
        inner.pending_len += 1;
    }

    /// Releases every attestation queued for slots up to and including
    /// `slot`, in slot order.
    pub fn on_slot(&self, slot: Slot) -> Vec<Attestation<C>> {
        let mut inner = self.inner.write();
        let remaining = inner.future_by_slot.split_off(&(slot + 1));
        let ready = std::mem::replace(&mut inner.future_by_slot, remaining);
        ready.into_values().flatten().collect()
    }

    /// Releases every attestation that was waiting on `block_root`.
    pub fn on_imported_block(&self, block_root: H256) -> Vec<Attestation<C>> {
        let mut inner = self.inner.write();
        let released = inner.pending_by_root.remove(&block_root).unwrap_or_default();
        inner.pending_len -= released.len();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MainnetConfig;
    use types::types::{AttestationData, Checkpoint};

    fn attestation(slot: Slot) -> Attestation<MainnetConfig> {
        Attestation {
            aggregation_bits: ssz_types::BitList::with_capacity(4).unwrap(),
            data: AttestationData {
                slot,
                index: 0,
                beacon_block_root: H256::zero(),
                source: Checkpoint::default(),
                target: Checkpoint::default(),
            },
            signature: types::primitives::SignatureBytes::empty(),
        }
    }

    #[test]
    fn future_attestations_release_in_slot_order() {
        let manager: AttestationManager<MainnetConfig> = AttestationManager::new();
        manager.queue_future(attestation(5));
        manager.queue_future(attestation(10));

        assert!(manager.on_slot(4).is_empty());
        assert_eq!(manager.on_slot(5).len(), 1);
        assert_eq!(manager.on_slot(10).len(), 1);
    }

    #[test]
    fn pending_attestations_release_on_their_block_import() {
        let manager: AttestationManager<MainnetConfig> = AttestationManager::new();
        let root = H256::repeat_byte(3);
        manager.queue_pending(root, attestation(1));
        assert!(manager.on_imported_block(H256::repeat_byte(9)).is_empty());
        assert_eq!(manager.on_imported_block(root).len(), 1);
    }
}
