//! External command execution
//!
//! Every invocation of the external VPN tool goes through the
//! `CommandRunner` seam so the controller can be exercised against test
//! doubles, and so every call carries an explicit timeout. The upstream tool
//! left connect and login unbounded; here no invocation runs without one.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Errors raised by command execution
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunnerError {
    #[error("command timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("failed to spawn command: {reason}")]
    Spawn { reason: String },

    #[error("command I/O failed: {reason}")]
    Io { reason: String },
}

/// Captured result of one external invocation
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Raw exit code when available
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_std(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Seam over the external VPN tool
///
/// `run` executes a sub-command to completion; `run_with_input` additionally
/// feeds the process standard input (used by the interactive sign-in).
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<CommandOutput, RunnerError>;

    async fn run_with_input(
        &self,
        args: &[&str],
        input: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RunnerError>;
}

/// Runner spawning the real external binary via tokio
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: String,
}

impl SystemRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<CommandOutput, RunnerError> {
        debug!(program = %self.program, ?args, "running external command");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| RunnerError::Timeout {
                seconds: timeout.as_secs(),
            })?
            .map_err(|e| RunnerError::Spawn {
                reason: e.to_string(),
            })?;

        Ok(CommandOutput::from_std(output))
    }

    async fn run_with_input(
        &self,
        args: &[&str],
        input: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RunnerError> {
        debug!(program = %self.program, ?args, "running external command with piped input");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let run = async {
            let mut child = cmd.spawn().map_err(|e| RunnerError::Spawn {
                reason: e.to_string(),
            })?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(input.as_bytes())
                    .await
                    .map_err(|e| RunnerError::Io {
                        reason: format!("failed to write to stdin: {e}"),
                    })?;
                stdin.flush().await.map_err(|e| RunnerError::Io {
                    reason: format!("failed to flush stdin: {e}"),
                })?;
                // Dropping stdin closes the pipe so the tool stops prompting
            }

            let output = child
                .wait_with_output()
                .await
                .map_err(|e| RunnerError::Io {
                    reason: format!("failed to collect output: {e}"),
                })?;

            Ok(CommandOutput::from_std(output))
        };

        tokio::time::timeout(timeout, run)
            .await
            .map_err(|_| RunnerError::Timeout {
                seconds: timeout.as_secs(),
            })?
    }
}
