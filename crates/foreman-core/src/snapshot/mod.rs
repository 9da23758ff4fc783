//! Fleet snapshots
//!
//! A [`Snapshot`] is an immutable point-in-time view of the fleet. It is
//! replaced wholesale on every successful refresh and never edited in place.

mod source;

pub use source::{CommandSnapshotSource, SnapshotSource, SourceError};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the fleet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub taken_at: Option<DateTime<Utc>>,
    /// False when the platform reports that no workspace exists yet
    pub initialized: bool,
    pub projects: Vec<Project>,
    pub workers: Vec<Worker>,
    pub managers: Vec<Manager>,
    pub merge_queue: Vec<QueueEntry>,
    pub work_items: Vec<WorkItem>,
    pub settings: GlobalSettings,
    /// Sub-collections that failed to load
    pub errors: Vec<LoadError>,
}

impl Snapshot {
    /// Snapshot for a platform without a workspace
    pub fn uninitialized() -> Self {
        Self {
            taken_at: Some(Utc::now()),
            initialized: false,
            ..Self::default()
        }
    }

    /// Number of sub-collections that failed to load
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// A sub-collection that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadError {
    pub section: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub repo_url: String,
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub max_workers: u32,
    pub merge_strategy: MergeStrategy,
    pub auto_merge: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            max_workers: 4,
            merge_strategy: MergeStrategy::default(),
            auto_merge: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Merge,
    Rebase,
    Squash,
    #[serde(other)]
    Unknown,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 3] = [Self::Merge, Self::Rebase, Self::Squash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Rebase => "rebase",
            Self::Squash => "squash",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Idle,
    Working,
    Stalled,
    Stopped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Stalled => "stalled",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Worker {
    pub project: String,
    pub name: String,
    pub state: WorkerState,
    pub work_item: Option<String>,
    pub session: Option<String>,
    pub host: Option<String>,
}

impl Worker {
    /// `project/name` address used by the platform CLI
    pub fn address(&self) -> String {
        format!("{}/{}", self.project, self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerRole {
    /// Per-project lifecycle manager
    #[default]
    Warden,
    /// Merge-queue processor
    Refinery,
    /// A role this build does not know how to drive
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ManagerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warden => f.write_str("warden"),
            Self::Refinery => f.write_str("refinery"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manager {
    pub project: String,
    pub role: ManagerRole,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueState {
    #[default]
    Queued,
    Merging,
    Conflicted,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Merging => "merging",
            Self::Conflicted => "conflicted",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueEntry {
    pub project: String,
    pub id: String,
    pub branch: String,
    pub author: String,
    pub state: QueueState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub status: String,
    pub project: Option<String>,
    pub depends_on: Vec<String>,
}

/// The globally scoped settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub default_preset: String,
    pub idle_timeout_mins: u32,
    pub notifications: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_preset: "standard".to_string(),
            idle_timeout_mins: 30,
            notifications: true,
        }
    }
}

/// Drill-down payload for one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDetail {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub recent_output: Vec<String>,
}

/// What a drill-down load is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DetailRequest {
    Project(String),
    Worker { project: String, name: String },
    Manager { project: String, role: ManagerRole },
    QueueEntry { project: String, id: String },
    WorkItem(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_parses_with_missing_sections() {
        let json = r#"{
            "initialized": true,
            "workers": [{"project": "api", "name": "w1", "state": "working"}]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.initialized);
        assert!(snapshot.projects.is_empty());
        assert_eq!(snapshot.workers[0].state, WorkerState::Working);
        assert_eq!(snapshot.workers[0].address(), "api/w1");
    }

    #[test]
    fn test_unknown_worker_state_is_tolerated() {
        let worker: Worker =
            serde_json::from_str(r#"{"project": "a", "name": "b", "state": "hibernating"}"#)
                .unwrap();
        assert_eq!(worker.state, WorkerState::Unknown);
    }

    #[test]
    fn test_unknown_enum_values_are_tolerated() {
        let project: Project = serde_json::from_str(
            r#"{"name": "api", "settings": {"merge_strategy": "fast-forward"}}"#,
        )
        .unwrap();
        assert_eq!(project.settings.merge_strategy, MergeStrategy::Unknown);

        let manager: Manager =
            serde_json::from_str(r#"{"project": "api", "role": "auditor", "running": true}"#)
                .unwrap();
        assert_eq!(manager.role, ManagerRole::Unknown);
        assert!(manager.running);

        let entries: Vec<QueueEntry> = serde_json::from_str(
            r#"[{"id": "mr-1", "state": "merged"}, {"id": "mr-2", "state": "queued"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].state, QueueState::Unknown);
        assert_eq!(entries[1].state, QueueState::Queued);
    }

    #[test]
    fn test_error_count_tracks_load_errors() {
        let mut snapshot = Snapshot::uninitialized();
        assert_eq!(snapshot.error_count(), 0);
        snapshot.errors.push(LoadError {
            section: "queue".into(),
            message: "timed out".into(),
        });
        assert_eq!(snapshot.error_count(), 1);
    }
}
