//! Outcome of one (or several merged) subprocess invocations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an execution.
///
/// The declaration order is the severity order used by
/// [`ExecutionResult::merge`]: `NotNeeded` ranks below `Success`, so a stage
/// that skipped one invocation and ran another reports `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    NotDone,
    NotNeeded,
    Success,
    SoftFailure,
    Failure,
    Panic,
}

impl ExecutionStatus {
    /// Whether the pipeline may continue after this status
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::NotNeeded | Self::Success | Self::SoftFailure)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::SoftFailure => "Success with messages",
            Self::Failure => "Failure",
            Self::NotNeeded => "Skipped",
            Self::NotDone => "Not done",
            Self::Panic => "Panic",
        }
    }
}

/// Captured diagnostics, exit code and status of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Diagnostic lines, typically the command's standard error
    pub error_output: Vec<String>,
    /// Standard output lines
    pub output: Vec<String>,
    pub exit_code: i32,
    pub status: ExecutionStatus,
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self::with_status(ExecutionStatus::NotDone)
    }
}

impl ExecutionResult {
    #[must_use]
    pub fn with_status(status: ExecutionStatus) -> Self {
        Self {
            error_output: Vec::new(),
            output: Vec::new(),
            exit_code: 0,
            status,
        }
    }

    #[must_use]
    pub fn not_needed() -> Self {
        Self::with_status(ExecutionStatus::NotNeeded)
    }

    /// A failure that never reached a subprocess (spawn error, missing preset)
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error_output: vec![message.into()],
            output: Vec::new(),
            exit_code: -1,
            status: ExecutionStatus::Failure,
        }
    }

    /// Classify a finished process.
    ///
    /// A missing exit code means the process was killed by a signal.
    #[must_use]
    pub fn from_exit(exit_code: Option<i32>, output: Vec<String>, error_output: Vec<String>) -> Self {
        let status = match exit_code {
            None => ExecutionStatus::Panic,
            Some(0) if error_output.is_empty() => ExecutionStatus::Success,
            Some(0) => ExecutionStatus::SoftFailure,
            Some(_) => ExecutionStatus::Failure,
        };

        Self {
            error_output,
            output,
            exit_code: exit_code.unwrap_or(-1),
            status,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Merge results of one logical stage.
    ///
    /// The merged status is the worst status; lines are concatenated in
    /// iteration order and the exit code is taken from the first result that
    /// carries the worst status. Merging nothing yields `NotDone`.
    pub fn merge<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ExecutionResult>,
    {
        let mut merged = Self::default();
        let mut worst: Option<(ExecutionStatus, i32)> = None;

        for result in results {
            merged.output.extend(result.output.iter().cloned());
            merged.error_output.extend(result.error_output.iter().cloned());
            if worst.is_none_or(|(status, _)| result.status > status) {
                worst = Some((result.status, result.exit_code));
            }
        }

        if let Some((status, exit_code)) = worst {
            merged.status = status;
            merged.exit_code = exit_code;
        }
        merged
    }
}

const DIVIDER_WIDTH: usize = 80;

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} → {}", self.status.label(), self.exit_code)?;
        if !self.error_output.is_empty() {
            let divider = "-".repeat(DIVIDER_WIDTH);
            writeln!(f, "{divider}")?;
            for line in &self.error_output {
                writeln!(f, "{line}")?;
            }
            writeln!(f, "{divider}")?;
        }
        Ok(())
    }
}
