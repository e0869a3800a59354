//! Sync domain module.
//!
//! Pure types for keeping a local store consistent with a remote one:
//! status lifecycle, snapshots, and the merge rule. The orchestration lives
//! in `application::SyncEngine`.

mod errors;
mod merge;
mod snapshot;
mod status;

pub use errors::SyncError;
pub use merge::{merge, remote_wins, MergeOutcome};
pub use snapshot::{Snapshot, SyncRecord};
pub use status::{SyncState, SyncStatus};
