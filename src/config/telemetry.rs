//! Telemetry configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetryConfig {
    /// Log filter directive, e.g. `info` or `habit_pro_core=debug`.
    /// Unset means use `RUST_LOG`, then `info`.
    pub log_level: Option<String>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl TelemetryConfig {
    /// Build the filter for the subscriber
    pub fn env_filter(&self) -> Result<EnvFilter, ValidationError> {
        match &self.log_level {
            Some(directive) => EnvFilter::try_new(directive)
                .map_err(|_| ValidationError::InvalidLogLevel(directive.clone())),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
        }
    }

    /// Validate telemetry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.env_filter().map(|_| ())
    }
}
