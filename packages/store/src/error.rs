//! Errors raised by durable key-value backends.

use thiserror::Error;

/// Failure while reading or writing durable client storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    /// The platform storage could not be reached (e.g. `localStorage` disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
