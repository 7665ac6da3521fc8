//! An opaque, column-partitioned key/value interface, implemented once
//! in-memory. A disk-backed implementation (e.g. `leveldb`/`rocksdb`) can
//! satisfy the same trait without the rest of the crate changing.

use std::collections::BTreeMap;

use parking_lot::RwLock;

pub type Column = &'static str;

/// A single write within an atomic `write_batch`.
pub enum WriteOp {
    Put { column: Column, key: Vec<u8>, value: Vec<u8> },
    Delete { column: Column, key: Vec<u8> },
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, column: Column, key: &[u8]) -> Option<Vec<u8>>;
    fn put(&self, column: Column, key: &[u8], value: &[u8]);
    fn delete(&self, column: Column, key: &[u8]);

    /// Applies every operation in `batch` as a single atomic transaction:
    /// readers never observe a partially applied batch.
    fn write_batch(&self, batch: Vec<WriteOp>);
}

/// `BTreeMap`-backed store used by default and by tests. Keyed by
/// `(column, key)` so a single map enforces column isolation without a
/// nested structure.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<BTreeMap<(Column, Vec<u8>), Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, column: Column, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(&(column, key.to_vec())).cloned()
    }

    fn put(&self, column: Column, key: &[u8], value: &[u8]) {
        self.data.write().insert((column, key.to_vec()), value.to_vec());
    }

    fn delete(&self, column: Column, key: &[u8]) {
        self.data.write().remove(&(column, key.to_vec()));
    }

    fn write_batch(&self, batch: Vec<WriteOp>) {
        let mut data = self.data.write();
        for op in batch {
            match op {
                WriteOp::Put { column, key, value } => {
                    data.insert((column, key), value);
                }
                WriteOp::Delete { column, key } => {
                    data.remove(&(column, key));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_batch_applies_every_op() {
        let store = InMemoryStore::new();
        store.write_batch(vec![
            WriteOp::Put { column: "a", key: vec![1], value: vec![10] },
            WriteOp::Put { column: "b", key: vec![1], value: vec![20] },
        ]);
        assert_eq!(store.get("a", &[1]), Some(vec![10]));
        assert_eq!(store.get("b", &[1]), Some(vec![20]));
    }

    #[test]
    fn columns_are_isolated() {
        let store = InMemoryStore::new();
        store.put("a", &[1], &[10]);
        store.put("b", &[1], &[20]);
        assert_eq!(store.get("a", &[1]), Some(vec![10]));
        assert_eq!(store.get("b", &[1]), Some(vec![20]));
        store.delete("a", &[1]);
        assert_eq!(store.get("a", &[1]), None);
        assert_eq!(store.get("b", &[1]), Some(vec![20]));
    }
}
