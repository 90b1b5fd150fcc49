//! # RocksDB Backend
//!
//! Embedded LSM engine, the production default.
//!
//! Tuned for blockchain workloads: Snappy compression, bloom filters for
//! point reads, sync writes for durability by default.

use crate::error::KvError;
use crate::store::{BatchOp, KvStore};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;

/// RocksDB tuning knobs.
#[derive(Debug, Clone)]
pub struct RocksOptions {
    /// Block cache size in bytes.
    pub block_cache_size: usize,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for RocksOptions {
    fn default() -> Self {
        Self {
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksOptions {
    /// Smaller buffers, no fsync. Keeps test suites fast.
    pub fn for_testing() -> Self {
        Self {
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 2 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksKv {
    db: DB,
    sync_writes: bool,
}

impl RocksKv {
    /// Open or create a database at `path`.
    pub fn open(path: impl AsRef<Path>, tuning: RocksOptions) -> Result<Self, KvError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(tuning.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(tuning.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, path.as_ref())
            .map_err(|e| KvError::Io(format!("failed to open RocksDB: {e}")))?;

        Ok(Self {
            db,
            sync_writes: tuning.sync_writes,
        })
    }

    fn write_opts(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        write_opts
    }
}

impl KvStore for RocksKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        self.db
            .get(key)
            .map_err(|e| KvError::Io(format!("RocksDB get failed: {e}")))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        self.db
            .put_opt(key, value, &self.write_opts())
            .map_err(|e| KvError::Io(format!("RocksDB put failed: {e}")))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOp>) -> Result<(), KvError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOp::Put { key, value } => batch.put(&key, &value),
                BatchOp::Delete { key } => batch.delete(&key),
            }
        }
        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| KvError::Io(format!("RocksDB batch write failed: {e}")))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KvError> {
        self.db
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| KvError::Io(format!("RocksDB exists check failed: {e}")))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KvError> {
        let mut results = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) =
                item.map_err(|e| KvError::Io(format!("RocksDB scan failed: {e}")))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }

        Ok(results)
    }
}
