//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*};

use crate::config::{TelemetryConfig, ValidationError};

/// Install the global subscriber described by `config`.
///
/// Returns `Ok(false)` if a subscriber was already installed, which happens
/// when tests or an embedding application got there first.
pub fn init_tracing(config: &TelemetryConfig) -> Result<bool, ValidationError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json()).try_init().is_ok()
    } else {
        registry.with(fmt::layer()).try_init().is_ok()
    };

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported_not_fatal() {
        let config = TelemetryConfig {
            log_level: Some("warn".to_string()),
            json: false,
        };
        let _ = init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let config = TelemetryConfig {
            log_level: Some("habit_pro_core=loud".to_string()),
            json: true,
        };
        assert!(init_tracing(&config).is_err());
    }
}
