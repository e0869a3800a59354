//! Synchronization configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::DEFAULT_LOCAL_KEY_PREFIX;

/// Synchronization configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Give up waiting for a sync after this many seconds. Unset means wait.
    pub timeout_secs: Option<u64>,

    /// Prefix of the local sync payload key
    #[serde(default = "default_local_key_prefix")]
    pub local_key_prefix: String,
}

impl SyncConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate sync configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidSyncTimeout);
        }
        if self.local_key_prefix.trim().is_empty() {
            return Err(ValidationError::EmptyKeyPrefix);
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            local_key_prefix: default_local_key_prefix(),
        }
    }
}

fn default_local_key_prefix() -> String {
    DEFAULT_LOCAL_KEY_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.timeout(), None);
        assert_eq!(config.local_key_prefix, "sync:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = SyncConfig {
            timeout_secs: Some(15),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SyncConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSyncTimeout));
    }

    #[test]
    fn test_blank_prefix_rejected() {
        let config = SyncConfig {
            local_key_prefix: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyKeyPrefix));
    }
}
