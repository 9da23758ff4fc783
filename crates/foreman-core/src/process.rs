//! Platform CLI invocation
//!
//! Both the snapshot source and the action executor talk to the fleet through
//! its command-line tool. Deadlines are the caller's concern; a dropped future
//! kills the child.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

/// Captured output of one platform command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CliOutput {
    /// Most useful human-readable failure text: stderr, else stdout
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "command failed without output".to_string()
    }
}

/// Handle to the fleet command-line tool
#[derive(Debug, Clone)]
pub struct PlatformCli {
    bin: String,
    workspace: Option<PathBuf>,
}

impl PlatformCli {
    pub fn new(bin: impl Into<String>, workspace: Option<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            workspace,
        }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Run `bin args...` to completion
    pub async fn run<S: AsRef<str>>(&self, args: &[S]) -> std::io::Result<CliOutput> {
        let mut cmd = Command::new(&self.bin);
        for arg in args {
            cmd.arg(arg.as_ref());
        }
        if let Some(ref dir) = self.workspace {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            bin = %self.bin,
            args = %args.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join(" "),
            "Running platform command"
        );

        let output = cmd.output().await?;
        Ok(CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}
