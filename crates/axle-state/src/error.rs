use axle_kv::KvError;
use thiserror::Error;

/// Versioned state store error type.
///
/// Backend failures are fatal to the block in progress and propagate to the
/// caller unretried; retrying a non-idempotent write here could double-apply.
#[derive(Debug, Error)]
pub enum StateError {
    /// No value for the key (or no snapshot for the block hash).
    #[error("state key not found")]
    NotFound,

    /// An operation arrived outside its legal position in the
    /// `set* → next_txn → … → commit → finalize_block` cycle.
    #[error("state machine violation: {0}")]
    StateMachineViolation(&'static str),

    /// A block hash is already bound to a different version.
    #[error("snapshot conflict: block already bound to version {existing}, attempted {attempted}")]
    SnapshotConflict { existing: u64, attempted: u64 },

    /// Underlying storage failure.
    #[error("storage backend error: {0}")]
    Backend(#[from] KvError),

    /// Snapshot or marker row failed to decode.
    #[error("state codec error: {0}")]
    Codec(String),
}
