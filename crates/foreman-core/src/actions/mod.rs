//! Fleet actions
//!
//! An action is a named, targeted operation delegated to the platform. Foreman
//! only describes what to do; the [`CommandExecutor`] does it.

mod classify;
mod executor;

pub use classify::{classify_error, ErrorCategory};
pub use executor::{CliExecutor, CommandExecutor, ExecError};

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::config::Timeouts;
use crate::snapshot::ManagerRole;

/// Every operation Foreman can ask the platform to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SpawnWorker,
    StopWorker,
    RestartWorker,
    NukeWorker,
    NudgeWorker,
    SendMail,
    AttachWorker,
    AssignWork,
    SetDependencies,
    StartManager,
    StopManager,
    ProcessQueue,
    RetryMerge,
    RejectMerge,
    AddProject,
    RemoveProject,
    UpdateProjectSettings,
    UpdateGlobalSettings,
    Initialize,
    ShutdownAll,
}

impl ActionKind {
    /// Actions that destroy work or stop agents. These always go through a
    /// yes/no confirmation.
    pub const DESTRUCTIVE: [ActionKind; 6] = [
        Self::StopWorker,
        Self::NukeWorker,
        Self::StopManager,
        Self::RejectMerge,
        Self::RemoveProject,
        Self::ShutdownAll,
    ];

    pub fn is_destructive(&self) -> bool {
        Self::DESTRUCTIVE.contains(self)
    }

    /// Destructive actions plus edits to the globally scoped settings record
    pub fn requires_confirmation(&self) -> bool {
        self.is_destructive() || *self == Self::UpdateGlobalSettings
    }

    /// Actions that clone repositories, start sessions, or merge
    pub fn is_long_running(&self) -> bool {
        matches!(
            self,
            Self::SpawnWorker
                | Self::NukeWorker
                | Self::AddProject
                | Self::ProcessQueue
                | Self::Initialize
                | Self::ShutdownAll
        )
    }

    pub fn timeout(&self, timeouts: &Timeouts) -> Duration {
        if self.is_long_running() {
            timeouts.long_action
        } else {
            timeouts.action
        }
    }

    /// Human label, also used in status messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::SpawnWorker => "Spawn worker",
            Self::StopWorker => "Stop worker",
            Self::RestartWorker => "Restart worker",
            Self::NukeWorker => "Nuke worker",
            Self::NudgeWorker => "Nudge worker",
            Self::SendMail => "Send mail",
            Self::AttachWorker => "Attach",
            Self::AssignWork => "Assign work",
            Self::SetDependencies => "Set dependencies",
            Self::StartManager => "Start manager",
            Self::StopManager => "Stop manager",
            Self::ProcessQueue => "Process merge queue",
            Self::RetryMerge => "Retry merge",
            Self::RejectMerge => "Reject merge",
            Self::AddProject => "Add project",
            Self::RemoveProject => "Remove project",
            Self::UpdateProjectSettings => "Update project settings",
            Self::UpdateGlobalSettings => "Update global settings",
            Self::Initialize => "Initialize workspace",
            Self::ShutdownAll => "Shut down fleet",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What an action operates on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionTarget {
    Global,
    Project(String),
    Worker { project: String, name: String },
    Manager { project: String, role: ManagerRole },
    QueueEntry { project: String, id: String },
    WorkItem(String),
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("fleet"),
            Self::Project(name) => f.write_str(name),
            Self::Worker { project, name } => write!(f, "{project}/{name}"),
            Self::Manager { project, role } => write!(f, "{project}/{role}"),
            Self::QueueEntry { project, id } => write!(f, "{project}#{id}"),
            Self::WorkItem(id) => f.write_str(id),
        }
    }
}

/// Data collected by a modal before dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionInput {
    Text(String),
    Pair(String, String),
    Choice(String),
    Selection(Vec<String>),
    Fields(BTreeMap<String, String>),
}

/// A fully described action, ready to be confirmed or dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub input: Option<ActionInput>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, target: ActionTarget) -> Self {
        Self {
            kind,
            target,
            input: None,
        }
    }

    pub fn with_input(mut self, input: ActionInput) -> Self {
        self.input = Some(input);
        self
    }

    /// One-line description for confirmations and logs
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind.label(), self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destructive_set_requires_confirmation() {
        for kind in ActionKind::DESTRUCTIVE {
            assert!(kind.is_destructive());
            assert!(kind.requires_confirmation());
        }
        assert!(!ActionKind::RestartWorker.requires_confirmation());
        assert!(ActionKind::UpdateGlobalSettings.requires_confirmation());
        assert!(!ActionKind::UpdateGlobalSettings.is_destructive());
    }

    #[test]
    fn test_long_running_actions_get_extended_timeout() {
        let timeouts = Timeouts::default();
        assert_eq!(ActionKind::NudgeWorker.timeout(&timeouts), Duration::from_secs(30));
        assert_eq!(ActionKind::AddProject.timeout(&timeouts), Duration::from_secs(120));
    }

    #[test]
    fn test_target_display() {
        let target = ActionTarget::Worker {
            project: "api".into(),
            name: "w1".into(),
        };
        assert_eq!(target.to_string(), "api/w1");
        assert_eq!(
            ActionRequest::new(ActionKind::StopWorker, target).describe(),
            "Stop worker api/w1"
        );
    }
}
