//! Backend selection and construction.

use crate::error::KvError;
use crate::memory::MemoryKv;
use crate::redb_store::RedbKv;
use crate::rocks::{RocksKv, RocksOptions};
use crate::store::KvStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The closed set of storage engines.
///
/// Resolved once into a concrete implementation at construction; an
/// unrecognized selector in a config file fails deserialization, so a
/// misconfigured node never gets as far as its first read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KvKind {
    /// In-process map, no persistence. Tests and tooling.
    Memory,
    /// Embedded LSM engine (RocksDB). Production default.
    RocksDb,
    /// Embedded B-tree engine (redb).
    Redb,
}

/// Configuration for one storage backend instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KvConfig {
    /// Which engine to open.
    pub kind: KvKind,
    /// On-disk location. Ignored by `Memory`.
    #[serde(default)]
    pub path: PathBuf,
}

impl KvConfig {
    pub fn new(kind: KvKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// An in-memory instance for tests.
    pub fn in_memory() -> Self {
        Self {
            kind: KvKind::Memory,
            path: PathBuf::new(),
        }
    }
}

/// Open the backend a config selects.
///
/// Fails with [`KvError`] if the engine cannot be opened at `path`.
pub fn open_kv(cfg: &KvConfig) -> Result<Box<dyn KvStore>, KvError> {
    tracing::debug!(kind = ?cfg.kind, path = %cfg.path.display(), "opening kv backend");
    match cfg.kind {
        KvKind::Memory => Ok(Box::new(MemoryKv::new())),
        KvKind::RocksDb => Ok(Box::new(RocksKv::open(&cfg.path, RocksOptions::default())?)),
        KvKind::Redb => Ok(Box::new(RedbKv::open(&cfg.path)?)),
    }
}
