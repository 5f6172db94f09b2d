//! Event handling and progress display

use console::style;
use mak_builder::PipelineEvent;

/// Renders pipeline events as they arrive
pub struct EventHandler {
    json_output: bool,
    debug_enabled: bool,
}

impl EventHandler {
    pub fn new(json_output: bool, debug_enabled: bool) -> Self {
        Self {
            json_output,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: PipelineEvent) {
        if self.json_output {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
            }
            return;
        }

        match event {
            PipelineEvent::BuilderSelected {
                builder,
                stage,
                root,
            } => {
                self.show_status(&format!(
                    "🔧 {} selected for {} in {}",
                    style(builder).bold(),
                    stage,
                    root.display()
                ));
            }
            PipelineEvent::StageSkipped { builder, stage } => {
                if self.debug_enabled {
                    self.show_status(&format!(
                        "{}",
                        style(format!("⏭  {builder}: nothing to do for stage {stage}")).dim()
                    ));
                }
            }
            PipelineEvent::StageStarted {
                builder: _,
                stage,
                command,
            } => {
                self.show_status(&format!(
                    "Running stage {} → {}:",
                    style(stage).cyan(),
                    command
                ));
            }
            PipelineEvent::StageCompleted {
                builder,
                stage,
                result,
            } => {
                if !result.is_ok() {
                    self.show_error(&format!("🚫 Builder {builder} failed at stage {stage}\n{result}"));
                } else if self.debug_enabled || !result.error_output.is_empty() {
                    self.show_status(&format!("{result}"));
                }
            }
            PipelineEvent::CleanupFailed { builder, message } => {
                self.show_warning(&format!("cleanup after {builder} failed: {message}"));
            }
        }
    }

    fn show_status(&self, message: &str) {
        println!("{message}");
    }

    fn show_warning(&self, message: &str) {
        eprintln!("{} {message}", style("⚠").yellow());
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }
}
