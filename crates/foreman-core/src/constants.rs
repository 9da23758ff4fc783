//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// Polling configuration
pub mod refresh {
    use super::*;

    /// Interval between scheduler ticks
    pub const INTERVAL: Duration = Duration::from_millis(3000);

    /// Hard deadline for one snapshot refresh
    pub const TIMEOUT: Duration = Duration::from_secs(20);

    /// Hard deadline for one drill-down detail load
    pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Action execution configuration
pub mod actions {
    use super::*;

    /// Default deadline for an executor call
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Deadline for actions that clone, spawn sessions, or merge
    pub const LONG_TIMEOUT: Duration = Duration::from_secs(120);
}

/// Bounds on configured durations
pub mod limits {
    use super::*;

    /// Longest interval, timeout, or status window a config may ask for
    pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
}

/// Status line configuration
pub mod status {
    use super::*;

    /// How long info and success messages stay visible
    pub const DURATION: Duration = Duration::from_secs(4);

    /// How long error messages stay visible
    pub const ERROR_DURATION: Duration = Duration::from_secs(8);
}

/// Platform CLI configuration
pub mod platform {
    /// Default name of the fleet command-line tool
    pub const DEFAULT_BIN: &str = "fleet";

    /// Worker presets every platform install ships with
    pub const BUILTIN_PRESETS: &[&str] = &["standard", "fast", "thorough", "review"];
}

/// UI configuration
pub mod ui {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".foreman";

    /// Logs subdirectory name
    pub const LOGS_DIR_NAME: &str = "logs";
}
