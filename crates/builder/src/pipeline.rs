//! Stage pipeline driver
//!
//! Selection walks the stages in order and activates the first adapter that
//! is found and required. A found adapter with nothing to do hands over to
//! its successor, so an already configured cmake tree goes straight to
//! ninja. From there the chain decides: each successful run asks the current
//! adapter for the next one, and the first failing run stops the pipeline
//! after the adapter's cleanup hook.

use mak_errors::{BuildError, Error};
use mak_platform::{Platform, WorkDir};
use mak_types::{Environment, ExecutionResult, ExecutionStatus, Stage};

use crate::build_systems::BuildSystemRegistry;
use crate::builder::Builder;
use crate::events::{EventEmitter, EventSender, PipelineEvent};

/// Inputs of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    pub root: WorkDir,
    pub environment: Environment,
    /// First positional argument of the main segment; may be empty
    pub target: String,
    /// The full command line, segmented per stage at run time
    pub arguments: Vec<String>,
}

/// What happened at one step of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub builder: String,
    pub stage: Stage,
    pub result: ExecutionResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    #[must_use]
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// The outcome that stopped the pipeline
    pub fn failure(&self) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.result.is_ok())
    }

    /// All results merged into one
    #[must_use]
    pub fn merged(&self) -> ExecutionResult {
        ExecutionResult::merge(self.outcomes.iter().map(|outcome| &outcome.result))
    }

    /// Turn a failed run into [`BuildError::StageFailed`]
    ///
    /// # Errors
    ///
    /// Returns the failing step as an error.
    pub fn into_result(self) -> Result<Self, Error> {
        match self.failure() {
            Some(failed) => Err(BuildError::StageFailed {
                builder: failed.builder.clone(),
                stage: failed.stage.to_string(),
                exit_code: failed.result.exit_code,
            }
            .into()),
            None => Ok(self),
        }
    }
}

pub struct Pipeline<'a> {
    registry: &'a BuildSystemRegistry,
    platform: &'a Platform,
    event_sender: Option<EventSender>,
}

impl EventEmitter for Pipeline<'_> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a BuildSystemRegistry, platform: &'a Platform) -> Self {
        Self {
            registry,
            platform,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Follow `builder`'s successors until one is required or the chain ends
    fn resolve_required(builder: Builder) -> Result<Builder, Error> {
        let mut builder = builder;
        while builder.is_found() && !builder.required() {
            tracing::debug!(builder = builder.name(), stage = %builder.stage(), "not required, trying successor");
            builder = builder.next_builder()?;
        }
        Ok(builder)
    }

    /// The adapter the chain starts with
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoBuildSystemDetected`] if no stage yields a
    /// required adapter, or an error from adapter construction.
    pub fn select_active(&self, root: &WorkDir, env: &Environment) -> Result<Builder, Error> {
        for stage in Stage::all() {
            let selected = self.registry.select(root, stage, Some(env))?;
            let active = Self::resolve_required(selected)?;
            if active.is_found() {
                return Ok(active);
            }
        }

        Err(BuildError::NoBuildSystemDetected {
            path: root.path().display().to_string(),
        }
        .into())
    }

    /// Run the chain to completion or first failure.
    ///
    /// A failing step is reported in the returned [`PipelineReport`], not as
    /// an error; use [`PipelineReport::into_result`] to convert.
    ///
    /// # Errors
    ///
    /// Returns an error if selection fails or a successor cannot be
    /// constructed.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineReport, Error> {
        let mut current = self.select_active(&request.root, &request.environment)?;
        tracing::info!(builder = current.name(), stage = %current.stage(), "starting pipeline");
        self.emit(PipelineEvent::BuilderSelected {
            builder: current.name().to_string(),
            stage: current.stage(),
            root: current
                .root()
                .map_or_else(|| request.root.path().to_path_buf(), |root| root.path().to_path_buf()),
        });

        let mut report = PipelineReport::default();
        while current.is_found() {
            let builder = current.name().to_string();
            let stage = current.stage();

            if !current.required() {
                self.emit(PipelineEvent::StageSkipped {
                    builder: builder.clone(),
                    stage,
                });
                report.outcomes.push(StageOutcome {
                    builder,
                    stage,
                    result: ExecutionResult::with_status(ExecutionStatus::NotNeeded),
                });
                current = current.next_builder()?;
                continue;
            }

            let stage_args: Vec<String> = stage.filter_arguments(&request.arguments).to_vec();
            let command = current.describe(&request.target, &stage_args);
            tracing::info!(builder = %builder, stage = %stage, command = %command, "running stage");
            self.emit(PipelineEvent::StageStarted {
                builder: builder.clone(),
                stage,
                command,
            });

            let result = current
                .run(self.platform.process(), &request.target, &stage_args)
                .await;
            let ok = result.is_ok();
            tracing::debug!(builder = %builder, stage = %stage, status = ?result.status, exit_code = result.exit_code, "stage finished");

            self.emit(PipelineEvent::StageCompleted {
                builder: builder.clone(),
                stage,
                result: result.clone(),
            });
            report.outcomes.push(StageOutcome {
                builder: builder.clone(),
                stage,
                result,
            });

            if !ok {
                if let Err(e) = current.cleanup() {
                    tracing::warn!(builder = %builder, error = %e, "cleanup failed");
                    self.emit(PipelineEvent::CleanupFailed {
                        builder,
                        message: e.to_string(),
                    });
                }
                return Ok(report);
            }

            current = current.next_builder()?;
        }

        Ok(report)
    }
}
