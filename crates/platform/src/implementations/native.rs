//! Process operations backed by `tokio::process`

use async_trait::async_trait;
use mak_errors::PlatformError;
use mak_types::ExecutionResult;
use std::io;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

use crate::process::{PlatformCommand, ProcessOperations};

/// Spawns real subprocesses.
///
/// Standard error is always captured. Standard output is passed through to
/// the terminal unless `capture_output` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProcess {
    capture_output: bool,
}

impl NativeProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture standard output instead of inheriting it
    #[must_use]
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    fn spawn_error(cmd: &PlatformCommand, error: &io::Error) -> PlatformError {
        match error.kind() {
            io::ErrorKind::NotFound => PlatformError::CommandNotFound {
                command: cmd.program().to_string(),
            },
            io::ErrorKind::PermissionDenied => PlatformError::PermissionDenied {
                operation: format!("spawn {}", cmd.program()),
                message: error.to_string(),
            },
            _ => PlatformError::ProcessExecutionFailed {
                command: cmd.program().to_string(),
                message: error.to_string(),
            },
        }
    }
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ProcessOperations for NativeProcess {
    async fn execute_command(&self, cmd: PlatformCommand) -> ExecutionResult {
        let start = Instant::now();
        tracing::debug!(command = %cmd, cwd = ?cmd.get_current_dir(), "spawning");

        let mut command = Command::new(cmd.program());
        command
            .args(cmd.get_args())
            .env_clear()
            .envs(cmd.get_env_vars().iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .stdout(if self.capture_output {
                Stdio::piped()
            } else {
                Stdio::inherit()
            });

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let output = match command.spawn() {
            Ok(child) => child.wait_with_output().await,
            Err(e) => Err(e),
        };

        match output {
            Ok(output) => {
                let result = ExecutionResult::from_exit(
                    output.status.code(),
                    lines(&output.stdout),
                    lines(&output.stderr),
                );
                tracing::debug!(
                    command = %cmd,
                    exit_code = result.exit_code,
                    status = ?result.status,
                    elapsed_ms = start.elapsed().as_millis(),
                    "process finished"
                );
                result
            }
            Err(e) => {
                let error = Self::spawn_error(&cmd, &e);
                tracing::warn!(command = %cmd, error = %error, "failed to spawn");
                ExecutionResult::failure(error.to_string())
            }
        }
    }
}
