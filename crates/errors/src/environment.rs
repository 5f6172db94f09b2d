//! Environment lookup error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("missing variable: {name}")]
    Missing { name: String },

    #[error("cannot parse {name}={value}: {message}")]
    Parse {
        name: String,
        value: String,
        message: String,
    },
}

impl UserFacingError for EnvError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Missing { .. } => Some("Export the variable before running mak."),
            Self::Parse { .. } => Some("Correct the variable's value and retry."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Missing { .. } => "env.missing",
            Self::Parse { .. } => "env.parse",
        })
    }
}
