//! Foreman configuration
//!
//! Loaded from `~/.foreman/config.toml`. Every key is optional; a missing file
//! yields the defaults from [`crate::constants`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForemanConfig {
    /// Fleet command-line tool used for snapshots and actions
    pub bin: String,
    /// Working directory for platform commands (defaults to the cwd)
    pub workspace: Option<PathBuf>,
    pub refresh_interval_ms: u64,
    pub refresh_timeout_secs: u64,
    pub action_timeout_secs: u64,
    pub long_action_timeout_secs: u64,
    pub detail_timeout_secs: u64,
    pub status_secs: u64,
    pub error_status_secs: u64,
}

impl Default for ForemanConfig {
    fn default() -> Self {
        Self {
            bin: constants::platform::DEFAULT_BIN.to_string(),
            workspace: None,
            refresh_interval_ms: constants::refresh::INTERVAL.as_millis() as u64,
            refresh_timeout_secs: constants::refresh::TIMEOUT.as_secs(),
            action_timeout_secs: constants::actions::TIMEOUT.as_secs(),
            long_action_timeout_secs: constants::actions::LONG_TIMEOUT.as_secs(),
            detail_timeout_secs: constants::refresh::DETAIL_TIMEOUT.as_secs(),
            status_secs: constants::status::DURATION.as_secs(),
            error_status_secs: constants::status::ERROR_DURATION.as_secs(),
        }
    }
}

impl ForemanConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    /// Values are not validated here so that command-line overrides can still
    /// replace them; call [`ForemanConfig::validate`] on the final config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ForemanConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Reject values that would stall the loop or make every call time out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bin.trim().is_empty() {
            return Err(ConfigError::Invalid("bin must not be empty".into()));
        }
        let max = constants::limits::MAX_DURATION;
        let durations = [
            ("refresh_interval_ms", self.refresh_interval_ms, max.as_millis() as u64),
            ("refresh_timeout_secs", self.refresh_timeout_secs, max.as_secs()),
            ("action_timeout_secs", self.action_timeout_secs, max.as_secs()),
            ("long_action_timeout_secs", self.long_action_timeout_secs, max.as_secs()),
            ("detail_timeout_secs", self.detail_timeout_secs, max.as_secs()),
            ("status_secs", self.status_secs, max.as_secs()),
            ("error_status_secs", self.error_status_secs, max.as_secs()),
        ];
        for (name, value, limit) in durations {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
            }
            if value > limit {
                return Err(ConfigError::Invalid(format!("{name} must be at most {limit}")));
            }
        }
        if self.long_action_timeout_secs < self.action_timeout_secs {
            return Err(ConfigError::Invalid(
                "long_action_timeout_secs must be at least action_timeout_secs".into(),
            ));
        }
        Ok(())
    }

    /// Effective values in file format
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            refresh: Duration::from_secs(self.refresh_timeout_secs),
            action: Duration::from_secs(self.action_timeout_secs),
            long_action: Duration::from_secs(self.long_action_timeout_secs),
            detail: Duration::from_secs(self.detail_timeout_secs),
        }
    }

    pub fn status_durations(&self) -> StatusDurations {
        StatusDurations {
            normal: Duration::from_secs(self.status_secs),
            error: Duration::from_secs(self.error_status_secs),
        }
    }
}

/// Deadlines applied by the runtime to every asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub refresh: Duration,
    pub action: Duration,
    pub long_action: Duration,
    pub detail: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        ForemanConfig::default().timeouts()
    }
}

/// Visibility windows for status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDurations {
    pub normal: Duration,
    pub error: Duration,
}

impl Default for StatusDurations {
    fn default() -> Self {
        ForemanConfig::default().status_durations()
    }
}
