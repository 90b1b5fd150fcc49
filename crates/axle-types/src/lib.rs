//! # Axle Shared Types
//!
//! Domain entities shared by the admission pool and the versioned state
//! store.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   lives here.
//! - **Hash identity**: a [`SignedTxn`] is identified by its content-derived
//!   hash everywhere (pool membership, dedup, audit lookups).
//! - **Explicit namespaces**: modules address state through a [`Namespace`]
//!   handle created once at wiring time, never through ambient registries.

pub mod entities;
pub mod namespace;

pub use entities::*;
pub use namespace::Namespace;
