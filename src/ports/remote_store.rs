//! Remote Store Port - Interface for the cloud copy of a user's data.
//!
//! Transport and authentication are the adapter's concern. The core only
//! needs success/failure, the stored snapshot, and a revision number used
//! for optimistic concurrency on upload.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::sync::Snapshot;

/// Errors reported by a remote store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Transport-level failure; the request may or may not have landed.
    #[error("Network failure: {0}")]
    Network(String),

    /// Upload was based on a stale revision.
    #[error("Revision mismatch: expected {expected}, remote is at {actual}")]
    RevisionMismatch { expected: u64, actual: u64 },
}

/// Port for uploading, downloading and deleting a user's remote snapshot.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload `snapshot` for `owner`.
    ///
    /// Succeeds only if `snapshot.revision` equals the remote's current
    /// revision (0 when nothing is stored).
    ///
    /// # Returns
    /// The new remote revision
    ///
    /// # Errors
    /// Returns `RemoteError::RevisionMismatch` if the remote moved on
    async fn upload(&self, owner: &UserId, snapshot: &Snapshot) -> Result<u64, RemoteError>;

    /// Download the stored snapshot for `owner`, if any.
    ///
    /// The returned snapshot's `revision` is the remote's current revision.
    async fn download(&self, owner: &UserId) -> Result<Option<Snapshot>, RemoteError>;

    /// Delete everything stored for `owner`.
    async fn delete_all(&self, owner: &UserId) -> Result<(), RemoteError>;
}
