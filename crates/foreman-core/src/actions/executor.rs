//! Action execution
//!
//! [`CommandExecutor`] is the contract the dispatcher calls. [`CliExecutor`]
//! maps each action onto an invocation of the fleet command-line tool.

use async_trait::async_trait;
use thiserror::Error;

use super::{ActionInput, ActionKind, ActionTarget};
use crate::process::PlatformCli;
use crate::snapshot::ManagerRole;

/// A failed action: human-readable message plus whatever output was produced
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ExecError {
    pub message: String,
    pub partial_output: String,
}

impl ExecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            partial_output: String::new(),
        }
    }
}

/// Performs side-effecting fleet operations
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run one action to completion, returning its output
    async fn execute(
        &self,
        kind: ActionKind,
        target: &ActionTarget,
        input: Option<&ActionInput>,
    ) -> Result<String, ExecError>;
}

/// Executor backed by the fleet command-line tool
pub struct CliExecutor {
    cli: PlatformCli,
}

impl CliExecutor {
    pub fn new(cli: PlatformCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl CommandExecutor for CliExecutor {
    async fn execute(
        &self,
        kind: ActionKind,
        target: &ActionTarget,
        input: Option<&ActionInput>,
    ) -> Result<String, ExecError> {
        let args = command_args(kind, target, input)?;
        tracing::info!(action = %kind, target = %target, "Executing action");

        let output = self
            .cli
            .run(&args)
            .await
            .map_err(|e| ExecError::new(format!("{}: {}", self.cli.bin(), e)))?;

        if output.success {
            Ok(output.stdout)
        } else {
            Err(ExecError {
                message: output.failure_message(),
                partial_output: output.stdout,
            })
        }
    }
}

/// Build the argv for one action. Fails when the input does not fit the
/// action, which means a modal produced the wrong shape.
pub fn command_args(
    kind: ActionKind,
    target: &ActionTarget,
    input: Option<&ActionInput>,
) -> Result<Vec<String>, ExecError> {
    let target_str = target.to_string();
    let mismatch = || ExecError::new(format!("{kind}: unexpected input for {target_str}"));

    let mut args: Vec<String> = match (kind, input) {
        (ActionKind::SpawnWorker, Some(ActionInput::Choice(preset))) => {
            vec!["worker".into(), "spawn".into(), target_str.clone(), "--preset".into(), preset.clone()]
        }
        (ActionKind::SpawnWorker, None) => vec!["worker".into(), "spawn".into(), target_str.clone()],
        (ActionKind::StopWorker, None) => vec!["worker".into(), "stop".into(), target_str.clone()],
        (ActionKind::RestartWorker, None) => {
            vec!["worker".into(), "restart".into(), target_str.clone()]
        }
        (ActionKind::NukeWorker, None) => {
            vec!["worker".into(), "nuke".into(), target_str.clone(), "--force".into()]
        }
        (ActionKind::NudgeWorker, Some(ActionInput::Text(message))) => {
            vec!["worker".into(), "nudge".into(), target_str.clone(), message.clone()]
        }
        (ActionKind::SendMail, Some(ActionInput::Pair(subject, body))) => vec![
            "mail".into(),
            "send".into(),
            target_str.clone(),
            "--subject".into(),
            subject.clone(),
            "--body".into(),
            body.clone(),
        ],
        (ActionKind::AttachWorker, Some(ActionInput::Text(host))) if host.trim().is_empty() => {
            vec!["worker".into(), "attach".into(), target_str.clone(), "--detach".into()]
        }
        (ActionKind::AttachWorker, Some(ActionInput::Text(host))) => vec![
            "worker".into(),
            "attach".into(),
            target_str.clone(),
            "--detach".into(),
            "--host".into(),
            host.clone(),
        ],
        (ActionKind::AssignWork, Some(ActionInput::Choice(project))) => {
            vec!["work".into(), "assign".into(), target_str.clone(), project.clone()]
        }
        (ActionKind::SetDependencies, Some(ActionInput::Selection(ids))) => {
            let mut args = vec!["work".into(), "deps".into(), target_str.clone(), "--set".into()];
            args.push(ids.join(","));
            args
        }
        (ActionKind::StartManager, None) => manager_args(target, "start").ok_or_else(mismatch)?,
        (ActionKind::StopManager, None) => manager_args(target, "stop").ok_or_else(mismatch)?,
        (ActionKind::ProcessQueue, None) => {
            vec!["queue".into(), "process".into(), target_str.clone()]
        }
        (ActionKind::RetryMerge, None) => queue_args(target, "retry").ok_or_else(mismatch)?,
        (ActionKind::RejectMerge, None) => queue_args(target, "reject").ok_or_else(mismatch)?,
        (ActionKind::AddProject, Some(ActionInput::Pair(name, url))) => {
            vec!["project".into(), "add".into(), name.clone(), url.clone()]
        }
        (ActionKind::RemoveProject, None) => {
            vec!["project".into(), "remove".into(), target_str.clone(), "--yes".into()]
        }
        (ActionKind::UpdateProjectSettings, Some(ActionInput::Fields(fields))) => {
            let mut args = vec!["project".into(), "config".into(), target_str.clone()];
            args.extend(fields.iter().map(|(k, v)| format!("{k}={v}")));
            args
        }
        (ActionKind::UpdateGlobalSettings, Some(ActionInput::Fields(fields))) => {
            let mut args = vec!["config".into(), "set".into()];
            args.extend(fields.iter().map(|(k, v)| format!("{k}={v}")));
            args
        }
        (ActionKind::Initialize, Some(ActionInput::Text(path))) => {
            vec!["install".into(), path.clone()]
        }
        (ActionKind::ShutdownAll, None) => vec!["down".into(), "--all".into()],
        _ => return Err(mismatch()),
    };
    args.push("--quiet".into());
    Ok(args)
}

fn manager_args(target: &ActionTarget, verb: &str) -> Option<Vec<String>> {
    match target {
        ActionTarget::Manager { role: ManagerRole::Unknown, .. } => None,
        ActionTarget::Manager { project, role } => {
            Some(vec![role.to_string(), verb.to_string(), project.clone()])
        }
        _ => None,
    }
}

fn queue_args(target: &ActionTarget, verb: &str) -> Option<Vec<String>> {
    match target {
        ActionTarget::QueueEntry { project, id } => Some(vec![
            "queue".into(),
            verb.to_string(),
            project.clone(),
            id.clone(),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn worker() -> ActionTarget {
        ActionTarget::Worker {
            project: "api".into(),
            name: "w1".into(),
        }
    }

    #[test]
    fn test_worker_actions() {
        assert_eq!(
            command_args(ActionKind::StopWorker, &worker(), None).unwrap(),
            vec!["worker", "stop", "api/w1", "--quiet"]
        );
        assert_eq!(
            command_args(
                ActionKind::NudgeWorker,
                &worker(),
                Some(&ActionInput::Text("wake up".into()))
            )
            .unwrap(),
            vec!["worker", "nudge", "api/w1", "wake up", "--quiet"]
        );
    }

    #[test]
    fn test_manager_and_queue_targets() {
        let manager = ActionTarget::Manager {
            project: "api".into(),
            role: ManagerRole::Refinery,
        };
        assert_eq!(
            command_args(ActionKind::StopManager, &manager, None).unwrap(),
            vec!["refinery", "stop", "api", "--quiet"]
        );

        let entry = ActionTarget::QueueEntry {
            project: "api".into(),
            id: "mr-7".into(),
        };
        assert_eq!(
            command_args(ActionKind::RejectMerge, &entry, None).unwrap(),
            vec!["queue", "reject", "api", "mr-7", "--quiet"]
        );
    }

    #[test]
    fn test_fields_are_rendered_as_assignments() {
        let mut fields = BTreeMap::new();
        fields.insert("auto_merge".to_string(), "false".to_string());
        fields.insert("max_workers".to_string(), "6".to_string());
        assert_eq!(
            command_args(
                ActionKind::UpdateProjectSettings,
                &ActionTarget::Project("api".into()),
                Some(&ActionInput::Fields(fields))
            )
            .unwrap(),
            vec!["project", "config", "api", "auto_merge=false", "max_workers=6", "--quiet"]
        );
    }

    #[test]
    fn test_unknown_manager_role_is_not_driven() {
        let manager = ActionTarget::Manager {
            project: "api".into(),
            role: ManagerRole::Unknown,
        };
        assert!(command_args(ActionKind::StartManager, &manager, None).is_err());
    }

    #[test]
    fn test_mismatched_input_is_rejected() {
        assert!(command_args(ActionKind::NudgeWorker, &worker(), None).is_err());
        assert!(command_args(ActionKind::StopManager, &worker(), None).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_carries_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fleet");
        std::fs::write(&script, "#!/bin/sh\necho 'stopping...'\necho 'worker not found' >&2\nexit 1\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let executor = CliExecutor::new(PlatformCli::new(script.to_string_lossy().into_owned(), None));
        let err = executor
            .execute(ActionKind::StopWorker, &worker(), None)
            .await
            .unwrap_err();
        assert_eq!(err.message, "worker not found");
        assert_eq!(err.partial_output.trim(), "stopping...");
    }
}
