//! # Axle Versioned State Store
//!
//! Per-module, block-versioned key-value state.
//!
//! ## Role in System
//!
//! The execution pipeline writes transaction effects here between the
//! boundaries marked by [`StateKv::next_txn`]; [`StateKv::commit`] seals a
//! block's writes into a new version and returns its deterministic state
//! root; [`StateKv::finalize_block`] binds that version to the produced
//! block's hash so history stays queryable by block identity forever.
//!
//! ## Storage Layout
//!
//! Two [`axle_kv::KvStore`] instances:
//!
//! - **base**: payload rows, a `c`-tagged row per key holding the latest
//!   committed value, and an `h`-tagged row per (key, version) holding
//!   history
//! - **index**: snapshot rows binding block hashes to versions, plus the
//!   latest-version marker
//!
//! Uncommitted writes never touch either backend; a crash mid-block leaves
//! state exactly as if the block never executed.

pub mod error;
mod keys;
pub mod root;
pub mod store;

pub use error::StateError;
pub use root::state_root;
pub use store::{
    BlockSnapshot, ModuleState, StateKv, StateKvConfig, StateVersion, TxnStep,
};
