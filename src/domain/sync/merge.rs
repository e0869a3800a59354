//! Timestamp-wins merge of a remote snapshot into the local one.
//!
//! A remote record replaces the local record only when its `modified_at` is
//! strictly newer. Ties keep the local copy. Local records without a remote
//! counterpart are never removed.

use super::{Snapshot, SyncRecord};

/// Result of merging a remote snapshot into a local snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged snapshot, adopting the remote revision.
    pub snapshot: Snapshot,
    /// Remote records that did not exist locally.
    pub added: usize,
    /// Local records replaced by a strictly newer remote record.
    pub replaced: usize,
    /// Local records kept over an equal or older remote record.
    pub kept: usize,
}

impl MergeOutcome {
    /// Returns true if the local data changed.
    pub fn changed_local(&self) -> bool {
        self.added > 0 || self.replaced > 0
    }
}

/// Returns true if `remote` should replace `local`.
pub fn remote_wins(local: &SyncRecord, remote: &SyncRecord) -> bool {
    remote.modified_at > local.modified_at
}

/// Merges `remote` into `local`.
pub fn merge(local: &Snapshot, remote: &Snapshot) -> MergeOutcome {
    let mut merged = local.clone();
    let (mut added, mut replaced, mut kept) = (0, 0, 0);

    for (key, remote_record) in &remote.records {
        match local.records.get(key) {
            None => {
                merged.upsert(key.clone(), remote_record.clone());
                added += 1;
            }
            Some(local_record) => {
                if remote_wins(local_record, remote_record) {
                    merged.upsert(key.clone(), remote_record.clone());
                    replaced += 1;
                } else {
                    kept += 1;
                }
            }
        }
    }

    merged.revision = remote.revision;

    MergeOutcome {
        snapshot: merged,
        added,
        replaced,
        kept,
    }
}
