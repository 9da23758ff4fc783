//! Filesystem locations
//!
//! Everything Foreman writes lives under `~/.foreman`.

use std::path::PathBuf;

use crate::constants::ui::{CONFIG_DIR_NAME, LOGS_DIR_NAME};

/// Root config directory (`~/.foreman`), falling back to the current directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default config file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log directory
pub fn logs_dir() -> PathBuf {
    config_dir().join(LOGS_DIR_NAME)
}
