//! Opaque data snapshots exchanged between the local store and the remote.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::Timestamp;

/// One synchronized entity.
///
/// The payload is opaque to the engine; only `modified_at` is compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub payload: String,
    pub modified_at: Timestamp,
}

impl SyncRecord {
    pub fn new(payload: impl Into<String>, modified_at: Timestamp) -> Self {
        Self {
            payload: payload.into(),
            modified_at,
        }
    }
}

/// A keyed set of records plus the remote revision it is based on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Remote revision this snapshot was last reconciled with. `0` means
    /// never uploaded.
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub records: BTreeMap<String, SyncRecord>,
}

impl Snapshot {
    /// Creates an empty snapshot at revision 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures.
    pub fn with_record(mut self, key: impl Into<String>, record: SyncRecord) -> Self {
        self.records.insert(key.into(), record);
        self
    }

    /// Inserts or replaces a record.
    pub fn upsert(&mut self, key: impl Into<String>, record: SyncRecord) {
        self.records.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&SyncRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes for the key-value store.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a stored snapshot.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
