//! In-memory remote store for tests and offline sessions.
//!
//! Behaves like a revisioned document store: each user owns one snapshot,
//! every accepted upload bumps the revision, and uploads based on a stale
//! revision are rejected.
//!
//! # Example
//!
//! ```ignore
//! let remote = InMemoryRemoteStore::new();
//! remote.set_method_error("upload", RemoteError::Network("offline".into()));
//!
//! let result = remote.upload(&user, &snapshot).await;
//! assert!(result.is_err());
//! assert_eq!(remote.call_count("upload"), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::sync::Snapshot;
use crate::ports::{RemoteError, RemoteStore};

/// In-memory, revisioned remote store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteStore {
    inner: Arc<Mutex<RemoteState>>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct RemoteState {
    /// Stored snapshot per user; `revision` is the remote's revision.
    snapshots: HashMap<UserId, Snapshot>,

    /// Error to return on the next call to any method.
    next_error: Option<RemoteError>,

    /// Specific errors by method name. Persist until cleared.
    method_errors: HashMap<String, RemoteError>,

    /// Method names in call order.
    call_log: Vec<String>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Seed the remote with a snapshot for `owner`. The snapshot's revision
    /// becomes the remote revision.
    pub fn seed(&self, owner: &UserId, snapshot: Snapshot) {
        self.state().snapshots.insert(owner.clone(), snapshot);
    }

    /// Stored snapshot for `owner`, without recording a call.
    pub fn stored(&self, owner: &UserId) -> Option<Snapshot> {
        self.state().snapshots.get(owner).cloned()
    }

    /// Current remote revision for `owner` (0 when nothing is stored).
    pub fn revision(&self, owner: &UserId) -> u64 {
        self.state()
            .snapshots
            .get(owner)
            .map(|s| s.revision)
            .unwrap_or(0)
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: RemoteError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method (`upload`, `download`, `delete_all`).
    pub fn set_method_error(&self, method: &str, error: RemoteError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    /// All recorded method names.
    pub fn calls(&self) -> Vec<String> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.as_str() == method)
            .count()
    }

    fn state(&self) -> MutexGuard<'_, RemoteState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call, waits out the configured delay and applies any
    /// injected error.
    async fn enter(&self, method: &str) -> Result<(), RemoteError> {
        self.state().call_log.push(method.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut state = self.state();
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn upload(&self, owner: &UserId, snapshot: &Snapshot) -> Result<u64, RemoteError> {
        self.enter("upload").await?;

        let mut state = self.state();
        let current = state.snapshots.get(owner).map(|s| s.revision).unwrap_or(0);
        if snapshot.revision != current {
            return Err(RemoteError::RevisionMismatch {
                expected: snapshot.revision,
                actual: current,
            });
        }

        let mut stored = snapshot.clone();
        stored.revision = current + 1;
        let revision = stored.revision;
        state.snapshots.insert(owner.clone(), stored);
        Ok(revision)
    }

    async fn download(&self, owner: &UserId) -> Result<Option<Snapshot>, RemoteError> {
        self.enter("download").await?;
        Ok(self.state().snapshots.get(owner).cloned())
    }

    async fn delete_all(&self, owner: &UserId) -> Result<(), RemoteError> {
        self.enter("delete_all").await?;
        self.state().snapshots.remove(owner);
        Ok(())
    }
}
