//! # redb Backend
//!
//! Embedded B-tree engine, pure Rust. Single-file databases with ACID
//! write transactions, which map directly onto the atomic batch contract.

use crate::error::KvError;
use crate::store::{BatchOp, KvStore};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

const KV_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("axle_kv");

/// redb-backed key-value store.
pub struct RedbKv {
    db: Database,
}

impl RedbKv {
    /// Open or create a database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let db = Database::create(path.as_ref())
            .map_err(|e| KvError::Io(format!("failed to open redb: {e}")))?;

        // Materialize the table so reads on a fresh database see an empty
        // table instead of a missing one.
        let txn = db
            .begin_write()
            .map_err(|e| KvError::Io(format!("redb init txn failed: {e}")))?;
        txn.open_table(KV_TABLE)
            .map_err(|e| KvError::Io(format!("redb init table failed: {e}")))?;
        txn.commit()
            .map_err(|e| KvError::Io(format!("redb init commit failed: {e}")))?;

        Ok(Self { db })
    }
}

impl KvStore for RedbKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| KvError::Io(format!("redb read txn failed: {e}")))?;
        let table = txn
            .open_table(KV_TABLE)
            .map_err(|e| KvError::Io(format!("redb open table failed: {e}")))?;
        let value = table
            .get(key)
            .map_err(|e| KvError::Io(format!("redb get failed: {e}")))?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        self.atomic_batch_write(vec![BatchOp::put(key.to_vec(), value.to_vec())])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOp>) -> Result<(), KvError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| KvError::Io(format!("redb write txn failed: {e}")))?;
        {
            let mut table = txn
                .open_table(KV_TABLE)
                .map_err(|e| KvError::Io(format!("redb open table failed: {e}")))?;
            for op in operations {
                match op {
                    BatchOp::Put { key, value } => {
                        table
                            .insert(key.as_slice(), value.as_slice())
                            .map_err(|e| KvError::Io(format!("redb insert failed: {e}")))?;
                    }
                    BatchOp::Delete { key } => {
                        table
                            .remove(key.as_slice())
                            .map_err(|e| KvError::Io(format!("redb remove failed: {e}")))?;
                    }
                }
            }
        }
        txn.commit()
            .map_err(|e| KvError::Io(format!("redb commit failed: {e}")))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KvError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| KvError::Io(format!("redb read txn failed: {e}")))?;
        let table = txn
            .open_table(KV_TABLE)
            .map_err(|e| KvError::Io(format!("redb open table failed: {e}")))?;

        let mut results = Vec::new();
        let range = table
            .range(prefix..)
            .map_err(|e| KvError::Io(format!("redb range failed: {e}")))?;
        for item in range {
            let (key, value) =
                item.map_err(|e| KvError::Io(format!("redb scan failed: {e}")))?;
            if !key.value().starts_with(prefix) {
                break;
            }
            results.push((key.value().to_vec(), value.value().to_vec()));
        }

        Ok(results)
    }
}
