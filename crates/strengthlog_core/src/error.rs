//! Error types for the workout store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has been closed and no longer has a backing table.
    #[error("workout store is unavailable")]
    Unavailable,

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] strengthlog_storage::StorageError),

    /// The journal holds a record that cannot be a torn write.
    #[error("journal corrupted at offset {offset}: {message}")]
    Corrupted {
        /// Offset of the offending record.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// CBOR encoding of a journal record failed.
    #[error("codec error: {0}")]
    Codec(String),
}

impl StoreError {
    /// Creates a corruption error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::Corrupted {
            offset,
            message: message.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }
}
