//! Tracing subscriber setup
//!
//! Logs always go to stderr so they never interleave with the JSON event
//! stream or the build tools' own output on stdout.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str =
    "info,mak=debug,mak_builder=debug,mak_platform=debug,mak_config=debug";

/// Install the global subscriber. `RUST_LOG` wins over both defaults.
pub fn init_tracing(json_logs: bool, debug_enabled: bool) {
    let default = if debug_enabled {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(debug_enabled)
            .with_env_filter(filter)
            .init();
    }
}
