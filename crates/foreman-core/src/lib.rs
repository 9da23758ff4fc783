//! Foreman Core - Fleet snapshots, action execution, and configuration
//!
//! This crate provides everything the Foreman TUI consumes from the outside
//! world:
//! - Snapshot model and the [`SnapshotSource`] contract
//! - Action model and the [`CommandExecutor`] contract
//! - Failure classification for actionable hints
//! - Configuration and filesystem locations

pub mod actions;
pub mod config;
pub mod constants;
pub mod paths;
pub mod process;
pub mod snapshot;

// Re-exports for convenience
pub use actions::{
    classify_error, ActionInput, ActionKind, ActionRequest, ActionTarget, CliExecutor,
    CommandExecutor, ErrorCategory, ExecError,
};
pub use config::{ForemanConfig, StatusDurations, Timeouts};
pub use process::PlatformCli;
pub use snapshot::{
    CommandSnapshotSource, DetailRequest, EntityDetail, Snapshot, SnapshotSource, SourceError,
};
