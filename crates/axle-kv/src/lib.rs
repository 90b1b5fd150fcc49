//! # Axle Key-Value Storage
//!
//! Pluggable byte-oriented storage engines behind one capability trait.
//!
//! ## Role in System
//!
//! Leaf dependency of the versioned state store, which runs two instances
//! of it: an *index* store for snapshot/version metadata and a *base* store
//! for key/value payloads. Everything above this crate is backend-agnostic.
//!
//! ## Backends
//!
//! - `Memory`: in-process `BTreeMap`, for tests and tooling
//! - `RocksDb`: embedded LSM engine, the production default
//! - `Redb`: embedded B-tree engine, pure Rust alternative
//!
//! The backend is a closed enum resolved once at construction
//! ([`open_kv`]); there is no string dispatch on the access path, and a
//! backend that cannot be opened fails at construction, not at first use.

pub mod config;
pub mod error;
pub mod memory;
pub mod redb_store;
pub mod rocks;
pub mod store;

pub use config::{open_kv, KvConfig, KvKind};
pub use error::KvError;
pub use memory::MemoryKv;
pub use redb_store::RedbKv;
pub use rocks::{RocksKv, RocksOptions};
pub use store::{BatchOp, KvStore};
