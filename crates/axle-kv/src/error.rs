use thiserror::Error;

/// Errors surfaced by storage backends.
///
/// Backend failures are fatal to the operation that hit them; no backend
/// retries internally.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("storage corruption: {0}")]
    Corruption(String),
}
