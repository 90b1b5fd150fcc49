//! The storage capability trait every backend implements.

use crate::error::KvError;

/// Abstract interface for key-value database operations.
///
/// Production: [`crate::RocksKv`] / [`crate::RedbKv`].
/// Testing: [`crate::MemoryKv`].
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are. This is
    /// the primitive the state store commits whole versions through.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOp>) -> Result<(), KvError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KvError> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate over all entries whose key starts with `prefix`, in
    /// ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KvError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOp {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOp::Delete { key: key.into() }
    }
}
