//! Command line interface definition
//!
//! Only the main segment (everything before the first `---<stage>` marker) is
//! parsed here. Stage segments are handed to the build tools untouched.

use clap::Parser;
use mak_types::arguments::{find_argument, main_arguments};
use mak_types::ColorChoice;
use std::path::PathBuf;

/// Flags that print the stage listing instead of building
pub const HELP_FLAGS: &[&str] = &["--help", "-h", "-?"];

/// mak - one command for every build system
#[derive(Parser, Debug)]
#[command(name = "mak")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Detects the project's build system and runs its stages in order")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Target handed to the build tool
    pub target: Option<String>,

    /// Run as if started in DIR
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Build directory for cmake, meson and conan
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<String>,

    /// Use the working directory as is instead of the enclosing git root
    #[arg(long)]
    pub no_git_root: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print pipeline events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Write logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse the main segment of `args`
    pub fn parse_main(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(main_arguments(args))
    }
}

/// Whether the main segment asks for help
pub fn wants_help(args: &[String]) -> bool {
    find_argument(main_arguments(args), HELP_FLAGS).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_stage_segments_are_not_parsed() {
        let cli = Cli::parse_main(&args(&[
            "mak", "--debug", "app", "---build", "-j4", "--unknown",
        ]))
        .unwrap();
        assert_eq!(cli.target.as_deref(), Some("app"));
        assert!(cli.debug);
        assert!(!cli.json);
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_main(&args(&[
            "mak",
            "-C",
            "/src",
            "--build-dir",
            "out",
            "--no-git-root",
            "--color",
            "never",
        ]))
        .unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/src")));
        assert_eq!(cli.build_dir.as_deref(), Some("out"));
        assert!(cli.no_git_root);
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert!(cli.target.is_none());
    }

    #[test]
    fn test_help_only_in_main_segment() {
        assert!(wants_help(&args(&["mak", "-?"])));
        assert!(wants_help(&args(&["mak", "all", "--help"])));
        assert!(!wants_help(&args(&["mak", "---test", "--help"])));
        assert!(!wants_help(&args(&["mak"])));
    }
}
