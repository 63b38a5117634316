//! ADB command execution with timeout and outcome classification

use std::future::Future;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Outcome kind of one executor invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
    TimedOut,
    UnknownError,
}

/// Result of one executor invocation. Every failure path of the
/// executor resolves to one of these; the executor never returns `Err`.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: Option<String>,
}

impl CommandResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            stdout: stdout.into(),
            stderr: None,
        }
    }

    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failed,
            stdout: stdout.into(),
            stderr: Some(stderr.into()),
        }
    }

    pub fn timed_out() -> Self {
        Self {
            status: CommandStatus::TimedOut,
            stdout: String::new(),
            stderr: None,
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::UnknownError,
            stdout: String::new(),
            stderr: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

/// Seam between the gesture/gate layers and the external bridge tool.
/// Production code uses [`AdbExecutor`]; tests substitute a recording fake.
pub trait CommandRunner {
    fn run(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> impl Future<Output = CommandResult> + Send;
}

/// Runs adb subcommands as subprocesses, bounded by an explicit timeout.
#[derive(Debug, Clone)]
pub struct AdbExecutor {
    adb_path: String,
    device_id: Option<String>,
}

impl AdbExecutor {
    pub fn new() -> Self {
        Self {
            adb_path: "adb".to_string(),
            device_id: None,
        }
    }

    pub fn with_path(adb_path: impl Into<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            device_id: None,
        }
    }

    /// Target a specific device via `adb -s <id>`
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Build the command prefix with optional device specifier
    fn prefix(&self) -> Vec<String> {
        let mut prefix = vec![self.adb_path.clone()];
        if let Some(id) = &self.device_id {
            prefix.push("-s".to_string());
            prefix.push(id.to_string());
        }
        prefix
    }
}

impl Default for AdbExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for AdbExecutor {
    async fn run(&self, args: &[String], timeout: Duration) -> CommandResult {
        let prefix = self.prefix();
        let rendered = prefix
            .iter()
            .chain(args.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        info!("Running adb command: {}", rendered);

        let mut cmd = Command::new(&prefix[0]);
        for arg in &prefix[1..] {
            cmd.arg(arg);
        }
        for arg in args {
            cmd.arg(arg);
        }

        match tokio::time::timeout(timeout, cmd.output()).await {
            Err(_) => {
                error!(
                    "adb command timed out (>{:.1}s): {}",
                    timeout.as_secs_f64(),
                    rendered
                );
                CommandResult::timed_out()
            }
            Ok(Err(e)) => {
                error!("Unexpected error running adb command: {}", e);
                CommandResult::unknown(e.to_string())
            }
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                if output.status.success() {
                    if !stdout.trim().is_empty() {
                        debug!("Command output: {}", stdout.trim());
                    }
                    CommandResult::success(stdout)
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    error!("adb command failed ({}): {}", output.status, stderr);
                    CommandResult::failed(stdout, stderr)
                }
            }
        }
    }
}
