//! Snapshot acquisition
//!
//! [`SnapshotSource`] is the contract the control loop polls. The command
//! implementation collects each sub-collection independently so that a failing
//! merge queue or work list never hides the workers.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{
    DetailRequest, EntityDetail, GlobalSettings, LoadError, Manager, Project, QueueEntry, Snapshot,
    WorkItem, Worker,
};
use crate::process::PlatformCli;

/// Maximum number of output lines kept for a drill-down
const DETAIL_OUTPUT_LINES: usize = 40;

/// Primary-collection failures that mean "no workspace yet", not "broken"
static UNINITIALIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(not (in|inside) a workspace|no workspace found|workspace not initialized)")
        .expect("valid regex")
});

/// Snapshot source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// The primary collection could not be loaded
    #[error("{0}")]
    Primary(String),

    /// A drill-down load failed
    #[error("{0}")]
    Detail(String),

    #[error("failed to run platform command: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed platform output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Produces fleet snapshots and per-entity detail
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Collect a fresh snapshot. Only a primary-collection failure is an error;
    /// other sub-collections report through [`Snapshot::errors`].
    async fn refresh(&self) -> Result<Snapshot, SourceError>;

    /// Load drill-down detail for one entity
    async fn load_detail(&self, request: &DetailRequest) -> Result<EntityDetail, SourceError>;
}

/// Primary status report (`<bin> status --json`)
#[derive(Debug, Deserialize)]
struct StatusReport {
    #[serde(default = "default_true")]
    initialized: bool,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    workers: Vec<Worker>,
    #[serde(default)]
    managers: Vec<Manager>,
    #[serde(default)]
    settings: GlobalSettings,
}

fn default_true() -> bool {
    true
}

/// Snapshot source backed by the fleet command-line tool
pub struct CommandSnapshotSource {
    cli: PlatformCli,
}

impl CommandSnapshotSource {
    pub fn new(cli: PlatformCli) -> Self {
        Self { cli }
    }

    async fn collect<T: serde::de::DeserializeOwned>(&self, args: &[&str]) -> Result<T, String> {
        let output = self.cli.run(args).await.map_err(|e| e.to_string())?;
        if !output.success {
            return Err(output.failure_message());
        }
        serde_json::from_str(&output.stdout).map_err(|e| format!("malformed output: {e}"))
    }
}

#[async_trait]
impl SnapshotSource for CommandSnapshotSource {
    async fn refresh(&self) -> Result<Snapshot, SourceError> {
        let (status, queue, work) = futures::join!(
            self.collect::<StatusReport>(&["status", "--json"]),
            self.collect::<Vec<QueueEntry>>(&["queue", "list", "--json"]),
            self.collect::<Vec<WorkItem>>(&["work", "list", "--json"]),
        );

        let status = match status {
            Ok(status) => status,
            Err(message) if UNINITIALIZED.is_match(&message) => {
                tracing::info!("Platform reports no workspace");
                return Ok(Snapshot::uninitialized());
            }
            Err(message) => return Err(SourceError::Primary(message)),
        };

        let mut errors = Vec::new();
        let merge_queue = queue.unwrap_or_else(|message| {
            errors.push(LoadError {
                section: "queue".to_string(),
                message,
            });
            Vec::new()
        });
        let work_items = work.unwrap_or_else(|message| {
            errors.push(LoadError {
                section: "work".to_string(),
                message,
            });
            Vec::new()
        });

        Ok(Snapshot {
            taken_at: Some(Utc::now()),
            initialized: status.initialized,
            projects: status.projects,
            workers: status.workers,
            managers: status.managers,
            merge_queue,
            work_items,
            settings: status.settings,
            errors,
        })
    }

    async fn load_detail(&self, request: &DetailRequest) -> Result<EntityDetail, SourceError> {
        let args = detail_args(request);
        let output = self.cli.run(&args).await?;
        if !output.success {
            return Err(SourceError::Detail(output.failure_message()));
        }
        Ok(parse_detail(&output.stdout))
    }
}

fn detail_args(request: &DetailRequest) -> Vec<String> {
    let mut args: Vec<String> = match request {
        DetailRequest::Project(name) => vec!["project".into(), "show".into(), name.clone()],
        DetailRequest::Worker { project, name } => {
            vec!["worker".into(), "show".into(), format!("{project}/{name}")]
        }
        DetailRequest::Manager { project, role } => {
            vec![role.to_string(), "show".into(), project.clone()]
        }
        DetailRequest::QueueEntry { project, id } => {
            vec!["queue".into(), "show".into(), project.clone(), id.clone()]
        }
        DetailRequest::WorkItem(id) => vec!["work".into(), "show".into(), id.clone()],
    };
    args.push("--json".into());
    args
}

/// Flatten a detail document into display fields plus an output tail.
/// Non-JSON output is shown verbatim as the tail.
fn parse_detail(stdout: &str) -> EntityDetail {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(stdout) else {
        return EntityDetail {
            title: String::new(),
            fields: Vec::new(),
            recent_output: tail(stdout.lines().map(str::to_string).collect()),
        };
    };

    let title = ["title", "name", "id"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let mut fields = Vec::new();
    let mut recent_output = Vec::new();
    for (key, value) in &map {
        match (key.as_str(), value) {
            ("output" | "log", Value::Array(lines)) => {
                recent_output = lines
                    .iter()
                    .map(|l| l.as_str().map(str::to_string).unwrap_or_else(|| l.to_string()))
                    .collect();
            }
            ("output" | "log", Value::String(text)) => {
                recent_output = text.lines().map(str::to_string).collect();
            }
            (_, Value::String(s)) => fields.push((key.clone(), s.clone())),
            (_, Value::Number(n)) => fields.push((key.clone(), n.to_string())),
            (_, Value::Bool(b)) => fields.push((key.clone(), b.to_string())),
            (_, Value::Array(items)) => fields.push((
                key.clone(),
                items
                    .iter()
                    .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
            _ => {}
        }
    }

    EntityDetail {
        title,
        fields,
        recent_output: tail(recent_output),
    }
}

fn tail(mut lines: Vec<String>) -> Vec<String> {
    if lines.len() > DETAIL_OUTPUT_LINES {
        lines.drain(..lines.len() - DETAIL_OUTPUT_LINES);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ManagerRole;

    #[test]
    fn test_detail_args_per_entity() {
        assert_eq!(
            detail_args(&DetailRequest::Worker {
                project: "api".into(),
                name: "w1".into()
            }),
            vec!["worker", "show", "api/w1", "--json"]
        );
        assert_eq!(
            detail_args(&DetailRequest::Manager {
                project: "api".into(),
                role: ManagerRole::Refinery
            }),
            vec!["refinery", "show", "api", "--json"]
        );
    }

    #[test]
    fn test_parse_detail_flattens_scalars_and_output() {
        let detail = parse_detail(
            r#"{"name": "w1", "state": "working", "restarts": 2, "output": ["a", "b"]}"#,
        );
        assert_eq!(detail.title, "w1");
        assert!(detail
            .fields
            .contains(&("restarts".to_string(), "2".to_string())));
        assert_eq!(detail.recent_output, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_detail_plain_text_becomes_tail() {
        let text: String = (0..100).map(|i| format!("line {i}\n")).collect();
        let detail = parse_detail(&text);
        assert!(detail.fields.is_empty());
        assert_eq!(detail.recent_output.len(), DETAIL_OUTPUT_LINES);
        assert_eq!(detail.recent_output.last().unwrap(), "line 99");
    }

    #[test]
    fn test_status_report_tolerates_unknown_values() {
        let report: StatusReport = serde_json::from_str(
            r#"{
                "projects": [{"name": "api", "settings": {"merge_strategy": "fast-forward"}}],
                "managers": [{"project": "api", "role": "auditor", "running": true}],
                "workers": [{"project": "api", "name": "w1", "state": "working"}]
            }"#,
        )
        .unwrap();
        assert!(report.initialized);
        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.managers[0].role, ManagerRole::Unknown);
        assert_eq!(report.workers.len(), 1);
    }

    #[test]
    fn test_uninitialized_pattern() {
        assert!(UNINITIALIZED.is_match("Error: not in a workspace (run fleet install)"));
        assert!(!UNINITIALIZED.is_match("connection refused"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_partial_failure_is_reported_not_fatal() {
        // Fake platform CLI: status succeeds, queue fails, work succeeds
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fleet");
        std::fs::write(
            &script,
            "#!/bin/sh\ncase \"$1\" in\n  status) echo '{\"workers\": [{\"project\": \"api\", \"name\": \"w1\"}]}' ;;\n  queue) echo 'refinery offline' >&2; exit 1 ;;\n  work) echo '[]' ;;\nesac\n",
        )
        .unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let source = CommandSnapshotSource::new(PlatformCli::new(
            script.to_string_lossy().into_owned(),
            None,
        ));
        let snapshot = source.refresh().await.unwrap();
        assert!(snapshot.initialized);
        assert_eq!(snapshot.workers.len(), 1);
        assert_eq!(snapshot.error_count(), 1);
        assert_eq!(snapshot.errors[0].section, "queue");
        assert_eq!(snapshot.errors[0].message, "refinery offline");
    }
}
