//! Key-Value Store Port - Interface for local keyed persistence.
//!
//! Tier and sync payloads are stored as strings under application-defined
//! keys. Values are not versioned; callers treat absent or garbled values as
//! "not present".

use async_trait::async_trait;

/// Errors that can occur during key-value operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for the local keyed storage capability.
///
/// A single `set` must be atomic for its key; no cross-key guarantees.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
