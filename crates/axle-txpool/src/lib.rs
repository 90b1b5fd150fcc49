//! # Axle Transaction Pool
//!
//! Fee-ordered admission pool for validated, unconfirmed transactions.
//!
//! ## Role in System
//!
//! Transactions arrive from local clients and from peer sync responses, run
//! through the check pipeline, and are held sorted by fee price descending.
//! A block producer extracts a bounded prefix with [`TxPool::pack`] /
//! [`TxPool::pack_for`], executes it, and removes the included hashes with
//! [`TxPool::packed`].
//!
//! ## Data Structures
//!
//! - `by_hash`: O(1) membership and lookup by transaction hash
//! - `by_price`: O(log n) ordered index (BTreeSet), fee descending with
//!   arrival-order ties
//!
//! ## Invariants Enforced
//!
//! - No duplicate hashes (checked atomically with insertion)
//! - Front-to-back iteration is non-increasing by fee price at all times
//! - Index and ordered sequence mutate together under one lock; partial
//!   updates are never observable

pub mod checks;
pub mod error;
pub mod ordered;
pub mod pool;

pub use checks::{min_fee_check, run_checks, txn_size_check, TxnCheck};
pub use error::PoolError;
pub use pool::{PoolConfig, TxPool};
