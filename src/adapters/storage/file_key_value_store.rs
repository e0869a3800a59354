//! File-based Key-Value Store Adapter
//!
//! Stores each key as a single file under a base directory. Writes go to a
//! temporary sibling first and are renamed into place, so a reader never
//! sees a half-written value.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::ports::{KeyValueStore, StorageError};

/// File-based keyed storage
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileKeyValueStore::new("./data/habit-pro");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Map a key to its file. Bytes outside `[A-Za-z0-9_-.@+]` are
    /// percent-encoded, so `tier:alice` becomes `tier%3Aalice.val` and
    /// distinct keys never share a file.
    fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{}.val", encode_key(key))))
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

/// Percent-encodes `key` into a single file name component. A leading dot
/// is encoded too, so no key maps to a hidden file or a relative path.
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let safe = byte.is_ascii_alphanumeric()
            || matches!(byte, b'_' | b'-' | b'@' | b'+')
            || (byte == b'.' && i > 0);
        if safe {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.file_path(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        match String::from_utf8(bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Stored value is not valid UTF-8, treating as absent");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.file_path(key)?;
        self.ensure_dir().await?;

        let tmp = path.with_extension("val.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.file_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileKeyValueStore) {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("kv"));
        (dir, store)
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (_dir, store) = store();
        store.set("tier:alice@example.com", "premium").await.unwrap();
        assert_eq!(
            store.get("tier:alice@example.com").await.unwrap(),
            Some("premium".to_string())
        );
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.get("tier:bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_new_handle() {
        let (dir, store) = store();
        store.set("sync:alice", "{}").await.unwrap();

        let reopened = FileKeyValueStore::new(dir.path().join("kv"));
        assert_eq!(
            reopened.get("sync:alice").await.unwrap(),
            Some("{}".to_string())
        );
    }

    #[tokio::test]
    async fn remove_deletes_and_is_idempotent() {
        let (_dir, store) = store();
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn traversal_keys_stay_inside_base_dir() {
        let (dir, store) = store();
        store.set("../escape", "x").await.unwrap();
        store.set("a/b", "y").await.unwrap();

        assert!(!dir.path().join("escape.val").exists());
        assert_eq!(store.get("../escape").await.unwrap(), Some("x".to_string()));
        assert_eq!(store.get("a/b").await.unwrap(), Some("y".to_string()));
        assert!(matches!(
            store.remove("").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn key_encoding() {
        assert_eq!(encode_key("tier:user-1_x.y"), "tier%3Auser-1_x.y");
        assert_eq!(encode_key("tier:alice+habits@example.com"), "tier%3Aalice+habits@example.com");
        assert_eq!(encode_key(".hidden"), "%2Ehidden");
        assert_eq!(encode_key("with space"), "with%20space");
        assert_eq!(encode_key("100%"), "100%25");
    }

    #[tokio::test]
    async fn non_ascii_and_quoted_user_keys_round_trip() {
        let (_dir, store) = store();
        for key in [
            "tier:josé@example.com",
            "tier:o'brien@example.com",
            "tier:Jane Doe",
        ] {
            store.set(key, "premium").await.unwrap();
            assert_eq!(store.get(key).await.unwrap(), Some("premium".to_string()));
        }
        assert_eq!(store.get("tier:jose@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_utf8_value_reads_as_absent() {
        let (dir, store) = store();
        store.set("sync:alice@example.com", "{}").await.unwrap();
        std::fs::write(
            dir.path().join("kv").join("sync%3Aalice@example.com.val"),
            [0xff, 0xfe, 0x00],
        )
        .unwrap();

        assert_eq!(store.get("sync:alice@example.com").await.unwrap(), None);

        store.set("sync:alice@example.com", "{}").await.unwrap();
        assert_eq!(
            store.get("sync:alice@example.com").await.unwrap(),
            Some("{}".to_string())
        );
    }

    #[tokio::test]
    async fn colon_and_underscore_keys_do_not_collide() {
        let (_dir, store) = store();
        store.set("tier:a", "premium").await.unwrap();
        store.set("tier_a", "free").await.unwrap();
        assert_eq!(store.get("tier:a").await.unwrap(), Some("premium".to_string()));
    }
}
