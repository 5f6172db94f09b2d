#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the mak build orchestrator
//!
//! This crate provides the stage model, the command-line segmentation
//! grammar, the append-only environment store and the execution result
//! shared by every other crate.

pub mod arguments;
pub mod environment;
pub mod result;
pub mod stage;

// Re-export commonly used types
pub use arguments::{main_arguments, STAGE_SEPARATOR};
pub use environment::Environment;
pub use result::{ExecutionResult, ExecutionStatus};
pub use stage::{Stage, StageInfo};

use serde::{Deserialize, Serialize};

/// Color output choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
