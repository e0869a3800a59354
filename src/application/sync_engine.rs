//! SyncEngine - Push/pull/merge between the local store and the remote.
//!
//! One engine exists per signed-in user. It is the only writer of that
//! user's `SyncState`, which collaborators observe through `subscribe()`.
//!
//! # Concurrency
//!
//! `push`, `pull`, `sync` and `clear_remote` share a single guard. An
//! overlapping call fails immediately with `SyncError::InProgress` and leaves
//! the state untouched.
//!
//! # Lifecycle
//!
//! ```text
//! idle | error | success --begin--> syncing
//! syncing --sync ok--> success (sets last_synced_at)
//! syncing --push/pull ok--> idle
//! syncing --any failure--> error (keeps last_synced_at)
//! ```

use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use crate::domain::sync::{merge, MergeOutcome, Snapshot, SyncError, SyncRecord, SyncState};
use crate::ports::{KeyValueStore, RemoteError, RemoteStore};

/// Default key prefix for the local sync payload.
pub const DEFAULT_LOCAL_KEY_PREFIX: &str = "sync:";

/// Orchestrates synchronization for one user.
pub struct SyncEngine {
    owner: UserId,
    local_key: String,
    local: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteStore>,
    guard: Mutex<()>,
    state: watch::Sender<SyncState>,
}

impl SyncEngine {
    pub fn new(owner: UserId, local: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self::with_key_prefix(owner, local, remote, DEFAULT_LOCAL_KEY_PREFIX)
    }

    /// Creates an engine that stores its local snapshot under
    /// `prefix + owner`.
    pub fn with_key_prefix(
        owner: UserId,
        local: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteStore>,
        prefix: &str,
    ) -> Self {
        let (state, _) = watch::channel(SyncState::new());
        Self {
            local_key: format!("{}{}", prefix, owner),
            owner,
            local,
            remote,
            guard: Mutex::new(()),
            state,
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Key of the local snapshot in the key-value store.
    pub fn local_key(&self) -> &str {
        &self.local_key
    }

    /// Copy of the current state.
    pub fn sync_state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Operations
    // ════════════════════════════════════════════════════════════════════════

    /// Uploads the local snapshot. Does not touch `last_synced_at`.
    ///
    /// # Errors
    ///
    /// - `InProgress` if another operation holds the guard
    /// - `Conflict` if the remote moved on; `pull()` first
    /// - `Network` or `Storage` on I/O failure
    pub async fn push(&self) -> Result<u64, SyncError> {
        let _guard = self.acquire()?;
        self.transition(SyncState::begin);

        match self.push_local().await {
            Ok(revision) => {
                self.transition(SyncState::settle);
                Ok(revision)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Downloads the remote snapshot and merges it into the local one.
    ///
    /// # Errors
    ///
    /// - `InProgress` if another operation holds the guard
    /// - `Network` or `Storage` on I/O failure
    pub async fn pull(&self) -> Result<MergeOutcome, SyncError> {
        let _guard = self.acquire()?;
        self.transition(SyncState::begin);

        match self.pull_remote().await {
            Ok(outcome) => {
                self.transition(SyncState::settle);
                Ok(outcome)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Runs `push` then `pull` as one unit.
    ///
    /// A push failure skips the pull. On success the state becomes
    /// `Success` and `last_synced_at` is set to the completion time.
    pub async fn sync(&self) -> Result<(), SyncError> {
        let _guard = self.acquire()?;
        self.transition(SyncState::begin);
        debug!(owner = %self.owner, "Sync started");

        match self.push_then_pull().await {
            Ok(outcome) => {
                let at = Timestamp::now();
                self.transition(|state| state.succeed(at));
                info!(
                    owner = %self.owner,
                    revision = outcome.snapshot.revision,
                    added = outcome.added,
                    replaced = outcome.replaced,
                    "Sync completed"
                );
                Ok(())
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Deletes the remote copy. The state machine is not involved.
    ///
    /// Local records are kept; their revision is reset so the next push
    /// recreates the remote copy.
    pub async fn clear_remote(&self) -> Result<(), SyncError> {
        let _guard = self.acquire()?;

        self.remote
            .delete_all(&self.owner)
            .await
            .map_err(from_remote)?;

        let mut local = self.load_local().await?;
        if local.revision != 0 {
            local.revision = 0;
            self.save_local(&local).await?;
        }

        info!(owner = %self.owner, "Remote data cleared");
        Ok(())
    }

    /// Inserts or replaces a local record. Waits for any in-flight
    /// operation instead of failing.
    pub async fn record(&self, key: &str, record: SyncRecord) -> Result<(), SyncError> {
        let _guard = self.guard.lock().await;
        let mut local = self.load_local().await?;
        local.upsert(key, record);
        self.save_local(&local).await
    }

    /// The local snapshot as currently stored. Corrupt data reads as empty.
    pub async fn local_snapshot(&self) -> Result<Snapshot, SyncError> {
        self.load_local().await
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════

    fn acquire(&self) -> Result<MutexGuard<'_, ()>, SyncError> {
        self.guard.try_lock().map_err(|_| SyncError::InProgress)
    }

    fn transition<F>(&self, apply: F)
    where
        F: FnOnce(&mut SyncState) -> Result<(), ValidationError>,
    {
        self.state.send_modify(|state| {
            if let Err(err) = apply(state) {
                warn!(owner = %self.owner, error = %err, "Ignored invalid sync transition");
            }
        });
    }

    fn record_failure(&self, err: SyncError) -> SyncError {
        let message = err.to_string();
        self.transition(|state| state.fail(message));
        debug!(owner = %self.owner, error = %err, "Sync step failed");
        err
    }

    async fn push_then_pull(&self) -> Result<MergeOutcome, SyncError> {
        self.push_local().await?;
        self.pull_remote().await
    }

    async fn push_local(&self) -> Result<u64, SyncError> {
        let mut local = self.load_local().await?;
        debug!(owner = %self.owner, revision = local.revision, records = local.len(), "Pushing");

        let revision = self
            .remote
            .upload(&self.owner, &local)
            .await
            .map_err(from_remote)?;

        local.revision = revision;
        self.save_local(&local).await?;
        Ok(revision)
    }

    async fn pull_remote(&self) -> Result<MergeOutcome, SyncError> {
        let local = self.load_local().await?;
        let remote = self
            .remote
            .download(&self.owner)
            .await
            .map_err(from_remote)?
            .unwrap_or_default();
        debug!(owner = %self.owner, revision = remote.revision, records = remote.len(), "Pulled");

        let outcome = merge(&local, &remote);
        if outcome.changed_local() || outcome.snapshot.revision != local.revision {
            self.save_local(&outcome.snapshot).await?;
        }
        Ok(outcome)
    }

    async fn load_local(&self) -> Result<Snapshot, SyncError> {
        let raw = self
            .local
            .get(&self.local_key)
            .await
            .map_err(|e| SyncError::storage(e.to_string()))?;

        match raw {
            None => Ok(Snapshot::empty()),
            Some(raw) => match Snapshot::from_json(&raw) {
                Ok(snapshot) => Ok(snapshot),
                Err(err) => {
                    warn!(
                        owner = %self.owner,
                        key = %self.local_key,
                        error = %err,
                        "Corrupt local snapshot, treating as empty"
                    );
                    Ok(Snapshot::empty())
                }
            },
        }
    }

    async fn save_local(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        let raw = snapshot
            .to_json()
            .map_err(|e| SyncError::storage(e.to_string()))?;
        self.local
            .set(&self.local_key, &raw)
            .await
            .map_err(|e| SyncError::storage(e.to_string()))
    }
}

fn from_remote(err: RemoteError) -> SyncError {
    match err {
        RemoteError::Network(message) => SyncError::Network(message),
        RemoteError::RevisionMismatch { expected, actual } => SyncError::Conflict {
            local_revision: expected,
            remote_revision: actual,
        },
    }
}
