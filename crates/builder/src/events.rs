//! Progress events emitted by the pipeline driver
//!
//! The driver never prints; it sends [`PipelineEvent`]s over an unbounded
//! channel and the front end decides how to render them.

use mak_types::{ExecutionResult, Stage};
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// An adapter was chosen to start the chain
    BuilderSelected {
        builder: String,
        stage: Stage,
        root: PathBuf,
    },
    /// A chained adapter had nothing to do
    StageSkipped { builder: String, stage: Stage },
    StageStarted {
        builder: String,
        stage: Stage,
        command: String,
    },
    StageCompleted {
        builder: String,
        stage: Stage,
        result: ExecutionResult,
    },
    CleanupFailed { builder: String, message: String },
}

pub type EventSender = UnboundedSender<PipelineEvent>;
pub type EventReceiver = UnboundedReceiver<PipelineEvent>;

#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Types that can report pipeline progress
pub trait EventEmitter {
    fn event_sender(&self) -> Option<&EventSender>;

    fn emit(&self, event: PipelineEvent) {
        if let Some(sender) = self.event_sender() {
            // receiver gone means nobody is listening
            let _ = sender.send(event);
        }
    }
}
