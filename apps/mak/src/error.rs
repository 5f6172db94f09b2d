//! CLI error handling

use std::fmt;

use mak_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(mak_errors::ConfigError),
    /// Selection or pipeline error
    Build(mak_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Build(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Build(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<mak_errors::ConfigError> for CliError {
    fn from(e: mak_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<mak_errors::Error> for CliError {
    fn from(e: mak_errors::Error) -> Self {
        match e {
            mak_errors::Error::Config(e) => CliError::Config(e),
            other => CliError::Build(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
