//! Ordered build stages and their metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// One phase of the build pipeline.
///
/// Variants are declared in pipeline order, so the derived ordering is the
/// pipeline ordering. `Done` terminates the pipeline and is a fixed point of
/// [`Stage::next`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreRequisites,
    Configuration,
    Build,
    Test,
    Package,
    Install,
    #[default]
    Done,
}

/// Immutable metadata attached to a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    /// Display name
    pub name: &'static str,
    /// Token used in `---<token>` argument markers
    pub option: &'static str,
    /// One-line description shown in the help text
    pub description: &'static str,
}

impl Stage {
    /// Every runnable stage in pipeline order (excludes [`Stage::Done`])
    pub const ALL: [Stage; 6] = [
        Stage::PreRequisites,
        Stage::Configuration,
        Stage::Build,
        Stage::Test,
        Stage::Package,
        Stage::Install,
    ];

    /// Iterate the runnable stages in pipeline order.
    pub fn all() -> impl Iterator<Item = Stage> + Clone {
        Self::ALL.into_iter()
    }

    #[must_use]
    pub const fn info(self) -> StageInfo {
        match self {
            Stage::PreRequisites => StageInfo {
                name: "pre_requisites",
                option: "prereq",
                description: "Install pre-requisites using a package manager",
            },
            Stage::Configuration => StageInfo {
                name: "configure",
                option: "conf",
                description: "Build configuration stage.",
            },
            Stage::Build => StageInfo {
                name: "build",
                option: "build",
                description: "Build stage.",
            },
            Stage::Test => StageInfo {
                name: "test",
                option: "test",
                description: "Test stage.",
            },
            Stage::Package => StageInfo {
                name: "package",
                option: "pack",
                description: "Packaging stage.",
            },
            Stage::Install => StageInfo {
                name: "install",
                option: "inst",
                description: "Installation stage.",
            },
            Stage::Done => StageInfo {
                name: "DONE",
                option: "",
                description: "",
            },
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.info().name
    }

    #[must_use]
    pub const fn option(self) -> &'static str {
        self.info().option
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        self.info().description
    }

    /// The stage immediately after this one; `Done` stays `Done`.
    #[must_use]
    pub const fn next(self) -> Stage {
        match self {
            Stage::PreRequisites => Stage::Configuration,
            Stage::Configuration => Stage::Build,
            Stage::Build => Stage::Test,
            Stage::Test => Stage::Package,
            Stage::Package => Stage::Install,
            Stage::Install | Stage::Done => Stage::Done,
        }
    }

    /// Find the runnable stage registered under an option token.
    #[must_use]
    pub fn from_option(token: &str) -> Option<Stage> {
        Self::all().find(|stage| stage.option() == token)
    }

    /// Whether this stage terminates the pipeline
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Stage::Done)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
