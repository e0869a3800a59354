//! Synchronization status and observable sync state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, Timestamp, ValidationError};

/// Lifecycle status of the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Nothing running; initial state.
    #[default]
    Idle,
    /// A push, pull or sync is in flight.
    Syncing,
    /// Last operation failed; see `SyncState::error`.
    Error,
    /// Last full sync completed.
    Success,
}

impl SyncStatus {
    /// Returns true while an operation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SyncStatus::Syncing)
    }
}

impl StateMachine for SyncStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SyncStatus::*;
        matches!(
            (self, target),
            (Idle, Syncing)
                | (Error, Syncing)
                | (Success, Syncing)
                | (Syncing, Idle)
                | (Syncing, Success)
                | (Syncing, Error)
                | (Error, Idle)
                | (Success, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SyncStatus::*;
        match self {
            Idle => vec![Syncing],
            Syncing => vec![Idle, Success, Error],
            Error => vec![Syncing, Idle],
            Success => vec![Syncing, Idle],
        }
    }
}

/// Observable synchronization state.
///
/// Only the sync engine mutates this value; collaborators receive copies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// When the last full sync completed.
    pub last_synced_at: Option<Timestamp>,
    pub status: SyncStatus,
    /// Message of the failure that moved the state to `Error`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl SyncState {
    /// Creates an idle state that has never synced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Syncing` and clears any previous error.
    pub fn begin(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SyncStatus::Syncing)?;
        self.error = None;
        Ok(())
    }

    /// Leaves `Syncing` after a full sync, recording the completion time.
    pub fn succeed(&mut self, at: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SyncStatus::Success)?;
        self.last_synced_at = Some(at);
        Ok(())
    }

    /// Leaves `Syncing` after a standalone push or pull.
    pub fn settle(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SyncStatus::Idle)?;
        Ok(())
    }

    /// Leaves `Syncing` with a failure message. `last_synced_at` is kept.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SyncStatus::Error)?;
        self.error = Some(message.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_without_history() {
        let state = SyncState::new();
        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.last_synced_at, None);
        assert_eq!(state.error, None);
    }

    #[test]
    fn every_resting_state_may_start_a_sync() {
        for status in [SyncStatus::Idle, SyncStatus::Error, SyncStatus::Success] {
            assert!(status.can_transition_to(&SyncStatus::Syncing));
        }
    }

    #[test]
    fn cannot_start_while_syncing() {
        let mut state = SyncState::new();
        state.begin().unwrap();
        assert!(state.begin().is_err());
        assert_eq!(state.status, SyncStatus::Syncing);
    }

    #[test]
    fn success_records_completion_time() {
        let mut state = SyncState::new();
        state.begin().unwrap();
        let at = Timestamp::from_millis(1_000);
        state.succeed(at).unwrap();
        assert_eq!(state.status, SyncStatus::Success);
        assert_eq!(state.last_synced_at, Some(at));
    }

    #[test]
    fn failure_keeps_last_synced_at() {
        let mut state = SyncState::new();
        state.begin().unwrap();
        state.succeed(Timestamp::from_millis(1_000)).unwrap();
        state.begin().unwrap();
        state.fail("offline").unwrap();
        assert_eq!(state.status, SyncStatus::Error);
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert_eq!(state.last_synced_at, Some(Timestamp::from_millis(1_000)));
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut state = SyncState::new();
        state.begin().unwrap();
        state.fail("offline").unwrap();
        state.begin().unwrap();
        assert_eq!(state.error, None);
    }

    #[test]
    fn cannot_finish_without_starting() {
        let mut state = SyncState::new();
        assert!(state.succeed(Timestamp::now()).is_err());
        assert!(state.fail("x").is_err());
        assert_eq!(state.status, SyncStatus::Idle);
    }

    #[test]
    fn settle_returns_to_idle() {
        let mut state = SyncState::new();
        state.begin().unwrap();
        state.settle().unwrap();
        assert_eq!(state.status, SyncStatus::Idle);
    }

    #[test]
    fn serializes_with_camel_case_and_omits_empty_error() {
        let json = serde_json::to_value(SyncState::new()).unwrap();
        assert_eq!(json["status"], "idle");
        assert!(json["lastSyncedAt"].is_null());
        assert!(json.get("error").is_none());
    }
}
