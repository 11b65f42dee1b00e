//! Error types for the repository layer.

use strengthlog_core::StoreError;
use thiserror::Error;

/// Result type for repository and remote operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the repository and the remote mirror.
#[derive(Error, Debug)]
pub enum SyncError {
    /// An update named a workout that is not in the local store.
    #[error("workout not found: {id}")]
    NotFound {
        /// The missing id.
        id: String,
    },

    /// The remote collection is absent.
    #[error("remote workouts are unavailable")]
    RemoteUnavailable,

    /// The local store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A task on the blocking pool panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl SyncError {
    /// Creates a not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Returns true if the failure came from the remote side rather than
    /// the local store.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUnavailable)
    }
}

impl From<tokio::task::JoinError> for SyncError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors() {
        assert!(SyncError::RemoteUnavailable.is_remote());
        assert!(!SyncError::not_found("w1").is_remote());
        assert!(!SyncError::Store(StoreError::Unavailable).is_remote());
    }

    #[test]
    fn error_display() {
        let err = SyncError::not_found("w1");
        assert_eq!(err.to_string(), "workout not found: w1");

        let err: SyncError = StoreError::Unavailable.into();
        assert!(err.to_string().starts_with("store error"));
    }
}
