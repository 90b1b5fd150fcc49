//! In-memory backend for unit tests and ephemeral tooling.

use crate::error::KvError;
use crate::store::{BatchOp, KvStore};
use std::collections::BTreeMap;

/// In-memory key-value store.
///
/// `BTreeMap` keeps keys sorted, so `prefix_scan` has the same ordering
/// guarantees as the disk backends. Batch writes are trivially atomic on a
/// single thread.
#[derive(Default)]
pub struct MemoryKv {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOp>) -> Result<(), KvError> {
        for op in operations {
            match op {
                BatchOp::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KvError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KvError> {
        let results = self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}
