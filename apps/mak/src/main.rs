//! mak - one command for every build system
//!
//! Detects the build system of the current project, then walks the stage
//! pipeline from the first stage that has work to do until the chain of
//! build tools is exhausted or one of them fails.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use mak_builder::{BuildSystemRegistry, EventReceiver, Pipeline, PipelineReport, PipelineRequest};
use mak_config::Config;
use mak_platform::{find_git_root, NativeProcess, Platform, WorkDir};
use mak_types::arguments::command_from_args;
use std::future::Future;
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().collect();

    if cli::wants_help(&argv) {
        print!("{}", display::render_help(command_from_args(&argv)));
        return;
    }

    let cli = match Cli::parse_main(&argv) {
        Ok(cli) => cli,
        // --version and usage errors
        Err(e) => e.exit(),
    };
    let json_mode = cli.json;

    logging::init_tracing(cli.log_json, cli.debug);

    match run(cli, argv).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                println!("{}", serde_json::json!({ "type": "error", "message": e.to_string() }));
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic; `Ok(false)` means a stage failed
async fn run(cli: Cli, argv: Vec<String>) -> Result<bool, CliError> {
    info!("Starting mak v{}", env!("CARGO_PKG_VERSION"));

    // file config (or defaults), then MAK_* variables, then flags
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli);

    let root = project_root(cli.directory.clone(), config.build.use_git_root)?;
    let request = PipelineRequest {
        root: WorkDir::new(root),
        environment: config.environment(),
        target: cli.target.clone().unwrap_or_default(),
        arguments: argv,
    };

    let renderer = OutputRenderer::new(cli.json, config.general.color);
    let mut event_handler = EventHandler::new(renderer.json_output(), cli.debug);

    // keep stdout clean for the event stream in JSON mode
    let platform = Platform::new(Box::new(NativeProcess::new().capture_output(cli.json)));
    let registry = BuildSystemRegistry::new();
    let (event_sender, event_receiver) = mak_builder::events::channel();
    let pipeline = Pipeline::new(&registry, &platform).with_events(event_sender);

    let report =
        run_with_events(pipeline.run(&request), event_receiver, &mut event_handler).await?;

    renderer.render_report(&report)?;
    info!(success = report.success(), "pipeline finished");
    Ok(report.success())
}

/// Drive the pipeline while rendering its events
async fn run_with_events<F>(
    pipeline: F,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<PipelineReport, CliError>
where
    F: Future<Output = Result<PipelineReport, mak_errors::Error>>,
{
    let mut pipeline = Box::pin(pipeline);

    loop {
        select! {
            result = &mut pipeline => {
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result.map_err(CliError::from);
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Working directory, moved up to the enclosing git root when enabled
fn project_root(directory: Option<PathBuf>, use_git_root: bool) -> Result<PathBuf, CliError> {
    let cwd = match directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !use_git_root {
        return Ok(cwd);
    }
    Ok(find_git_root(&cwd).unwrap_or(cwd))
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) {
    if let Some(color) = cli.color {
        config.general.color = color;
    }
    if let Some(build_dir) = &cli.build_dir {
        config.build.build_dir = Some(build_dir.clone());
    }
    if cli.no_git_root {
        config.build.use_git_root = false;
    }
}
