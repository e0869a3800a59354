//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `HABIT_PRO` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use habit_pro_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod storage;
mod sync;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use storage::{StorageBackend, StorageConfig};
pub use sync::SyncConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::application::SessionOptions;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields an in-memory
/// setup with no sync timeout.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Local key-value storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Synchronization tuning
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HABIT_PRO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HABIT_PRO__STORAGE__BACKEND=file` -> `storage.backend = file`
    /// - `HABIT_PRO__SYNC__TIMEOUT_SECS=30` -> `sync.timeout_secs = 30`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HABIT_PRO")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a zero sync timeout, an empty key
    /// prefix, a file backend without a data directory or an unparsable
    /// log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.sync.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Session tuning derived from the sync section
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            sync_timeout: self.sync.timeout(),
            local_key_prefix: self.sync.local_key_prefix.clone(),
        }
    }
}
