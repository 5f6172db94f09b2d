//! Build pipeline error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("no build system detected in {path}")]
    NoBuildSystemDetected { path: String },

    #[error("{builder} failed at stage {stage} (exit code {exit_code})")]
    StageFailed {
        builder: String,
        stage: String,
        exit_code: i32,
    },

    #[error("preset not found: {preset}")]
    PresetNotFound { preset: String },

    #[error("cleanup after failed {builder} run did not complete: {message}")]
    CleanupFailed { builder: String, message: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoBuildSystemDetected { .. } => Some(
                "Run mak from a project directory containing a Makefile, CMakeLists.txt, meson.build, conanfile or similar.",
            ),
            Self::StageFailed { .. } => {
                Some("Inspect the diagnostics above, fix the project and re-run mak.")
            }
            Self::PresetNotFound { .. } => {
                Some("Pass one of the presets listed in CMakePresets.json as the target.")
            }
            Self::CleanupFailed { .. } => {
                Some("Remove the stale build directory by hand before the next run.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NoBuildSystemDetected { .. } => "build.no_build_system_detected",
            Self::StageFailed { .. } => "build.stage_failed",
            Self::PresetNotFound { .. } => "build.preset_not_found",
            Self::CleanupFailed { .. } => "build.cleanup_failed",
        };
        Some(code)
    }
}
