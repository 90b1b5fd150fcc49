use axle_types::Hash;
use thiserror::Error;

fn short(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

/// Admission pool error type.
///
/// Every rejection is per-transaction; batch operations report one of these
/// per input and never abort the rest of the batch.
#[derive(Clone, Debug, Error)]
pub enum PoolError {
    /// Transaction hash already present in the pool.
    #[error("duplicate transaction {}", short(.0))]
    Duplicate(Hash),

    /// A configured check rejected the transaction.
    #[error("check failed: {reason}")]
    CheckFailed { reason: String },

    /// Transaction not found in the pool.
    #[error("transaction not found: {}", short(.0))]
    NotFound(Hash),

    /// Pool has reached its configured capacity.
    #[error("pool full at {capacity} transactions")]
    PoolFull { capacity: usize },

    /// Encoded transaction exceeds the configured size ceiling.
    #[error("transaction size {size} exceeds maximum {max}")]
    TxnTooLarge { size: usize, max: usize },
}

impl PoolError {
    /// Convenience constructor for check implementations.
    pub fn check_failed(reason: impl Into<String>) -> Self {
        Self::CheckFailed {
            reason: reason.into(),
        }
    }
}
