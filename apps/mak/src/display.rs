//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use mak_builder::PipelineReport;
use mak_types::{ColorChoice, ExecutionStatus, Stage};
use serde_json::json;
use std::fmt::Write as _;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
}

impl OutputRenderer {
    /// Create new output renderer and apply the color choice process-wide
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        match color_choice {
            ColorChoice::Always => console::set_colors_enabled(true),
            ColorChoice::Never => console::set_colors_enabled(false),
            ColorChoice::Auto => {}
        }
        Self { json_output }
    }

    pub fn json_output(&self) -> bool {
        self.json_output
    }

    /// Render the pipeline summary
    pub fn render_report(&self, report: &PipelineReport) -> io::Result<()> {
        if self.json_output {
            println!("{}", Self::report_json(report));
            return Ok(());
        }
        if report.outcomes.is_empty() {
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Builder").add_attribute(Attribute::Bold),
                Cell::new("Stage").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Exit").add_attribute(Attribute::Bold),
            ]);

        for outcome in &report.outcomes {
            table.add_row(vec![
                Cell::new(&outcome.builder),
                Cell::new(outcome.stage),
                Cell::new(outcome.result.status.label()).fg(status_color(outcome.result.status)),
                Cell::new(outcome.result.exit_code),
            ]);
        }

        println!("{table}");
        Ok(())
    }

    /// Summary object printed after the event stream in JSON mode
    pub fn report_json(report: &PipelineReport) -> serde_json::Value {
        let merged = report.merged();
        json!({
            "type": "summary",
            "success": report.success(),
            "status": merged.status,
            "exit_code": merged.exit_code,
            "outcomes": report.outcomes.iter().map(|outcome| json!({
                "builder": outcome.builder,
                "stage": outcome.stage,
                "status": outcome.result.status,
                "exit_code": outcome.result.exit_code,
            })).collect::<Vec<_>>(),
        })
    }
}

fn status_color(status: ExecutionStatus) -> Color {
    match status {
        ExecutionStatus::Success => Color::Green,
        ExecutionStatus::SoftFailure => Color::Yellow,
        ExecutionStatus::NotNeeded | ExecutionStatus::NotDone => Color::DarkGrey,
        ExecutionStatus::Failure | ExecutionStatus::Panic => Color::Red,
    }
}

/// Usage text listing every stage marker
pub fn render_help(program: &str) -> String {
    let mut help = String::new();
    let _ = writeln!(
        help,
        "Usage: {} «Options» [target] ---«stage» options for stages",
        style(program).bold()
    );
    for stage in Stage::all() {
        let _ = writeln!(
            help,
            "\t---{} : stage {} - {}",
            style(stage.option()).cyan(),
            stage.name(),
            stage.description()
        );
    }
    let _ = writeln!(help, "\t--help, -h, -? : This message");
    let _ = writeln!(help);
    let _ = writeln!(help, "Options:");
    for (flag, text) in [
        ("-C, --directory <DIR>", "Run as if started in DIR"),
        ("--build-dir <DIR>", "Build directory for cmake, meson and conan"),
        ("--no-git-root", "Do not move to the enclosing git root"),
        ("--color <WHEN>", "always, auto or never"),
        ("--config <PATH>", "Use alternate config file"),
        ("--json", "Print pipeline events as JSON lines"),
        ("--log-json", "Write logs as JSON lines"),
        ("--debug", "Enable debug logging"),
        ("-V, --version", "Print version"),
    ] {
        let _ = writeln!(help, "\t{flag:<24} {text}");
    }
    help
}
