//! Synchronization error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by push, pull, sync and remote clearing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Transient transport failure. The caller may retry.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote moved on since the local snapshot was last reconciled.
    /// Requires a `pull()` before the next `push()`.
    #[error("Remote data changed (local revision {local_revision}, remote revision {remote_revision}); pull before pushing again")]
    Conflict {
        local_revision: u64,
        remote_revision: u64,
    },

    /// Another operation for this user is still in flight.
    #[error("A sync is already in progress")]
    InProgress,

    /// The local key-value store failed.
    #[error("Local storage error: {0}")]
    Storage(String),

    /// There is no signed-in identity to sync for.
    #[error("Sign in to sync")]
    NotSignedIn,
}

impl SyncError {
    pub fn network(message: impl Into<String>) -> Self {
        SyncError::Network(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        SyncError::Storage(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::Network(_) => ErrorCode::NetworkError,
            SyncError::Conflict { .. } => ErrorCode::SyncConflict,
            SyncError::InProgress => ErrorCode::SyncInProgress,
            SyncError::Storage(_) => ErrorCode::StorageUnavailable,
            SyncError::NotSignedIn => ErrorCode::NotSignedIn,
        }
    }

    /// Only transport failures are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }
}

impl From<SyncError> for DomainError {
    fn from(err: SyncError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
