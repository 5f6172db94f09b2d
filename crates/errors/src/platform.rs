//! Platform-specific operation errors

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur while spawning processes
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },
}

impl PlatformError {
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(self, Self::ProcessExecutionFailed { .. })
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some("Install the build tool or add it to PATH."),
            Self::PermissionDenied { .. } => Some("Check the permissions of the project tree."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ProcessExecutionFailed { .. } => "platform.process",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::PermissionDenied { .. } => "platform.permission_denied",
        })
    }
}
