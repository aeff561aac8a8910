//! Configuration loading and validation.
//!
//! The types live in `suitcast-types`; this module decides whether a loaded
//! configuration is usable. Any error here is fatal at startup.

use std::path::Path;

use suitcast_types::AppConfig;
use thiserror::Error;

use crate::reset_clock::ResetSchedule;

/// Application name used by `confy` for the default config location.
pub const APP_NAME: &str = "suitcast";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confy::ConfyError),
    #[error("invalid reset time {value:?}, expected HH:MM")]
    InvalidResetTime { value: String },
    #[error("UTC offset of {minutes} minutes is out of range")]
    InvalidUtcOffset { minutes: i32 },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Load from `path`, or from the per-user config location when `None`.
///
/// A missing file is created with defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = match path {
        Some(path) => confy::load_path(path)?,
        None => confy::load(APP_NAME, None)?,
    };
    validate(&config)?;
    Ok(config)
}

/// Where [`load_config`] reads from when no explicit path is given.
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let engine = &config.engine;
    require_positive("engine.history_capacity", engine.history_capacity)?;
    require_positive("engine.dedup_capacity", engine.dedup_capacity)?;
    require_positive("engine.fingerprint_prefix_chars", engine.fingerprint_prefix_chars)?;

    let schedule = &config.schedule;
    require_positive("schedule.max_active", schedule.max_active)?;
    if schedule.proximity_window == 0 {
        return Err(ConfigError::InvalidValue {
            field: "schedule.proximity_window",
            reason: "must be at least 1".to_string(),
        });
    }

    let rules = &config.rules;
    for (field, offset) in [
        ("rules.adjacent_offset", rules.adjacent_offset),
        ("rules.union_offset", rules.union_offset),
        ("rules.backup_offset", rules.backup_offset),
    ] {
        // A zero offset targets a record that has already been verified.
        if offset == 0 {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "offset must be at least 1".to_string(),
            });
        }
    }
    if rules.strategies.is_empty() {
        tracing::warn!("No rule strategies configured, predictions will never be made");
    }

    if config.source.poll_interval_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field: "source.poll_interval_ms",
            reason: "must be at least 1".to_string(),
        });
    }

    // Parsed even when disabled so a bad value is caught before it is enabled.
    ResetSchedule::from_config(&config.reset)?;
    Ok(())
}

fn require_positive(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_bounds_are_rejected() {
        let mut config = AppConfig::default();
        config.engine.history_capacity = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidValue {
                field: "engine.history_capacity",
                ..
            })
        ));

        let mut config = AppConfig::default();
        config.rules.backup_offset = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidValue {
                field: "rules.backup_offset",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_reset_values_are_fatal() {
        let mut config = AppConfig::default();
        config.reset.time = "25:00".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidResetTime { .. })
        ));

        let mut config = AppConfig::default();
        config.reset.utc_offset_minutes = 24 * 60;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUtcOffset { minutes: 1440 })
        ));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = std::env::temp_dir().join(format!("suitcast-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[schedule]\nmax_active = 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.schedule.max_active, 3);
        assert_eq!(config.engine.history_capacity, 100);

        std::fs::remove_dir_all(&dir).ok();
    }
}
