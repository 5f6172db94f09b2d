//! Splitting one command line into a main segment and per-stage segments
//!
//! A command line looks like
//! `mak [options] [target] ---build -j4 ---test --output-on-failure`.
//! Every `---<token>` marker closes the previous segment. The tokens after a
//! marker belong to the stage whose option token the marker names; markers
//! naming no known stage still close segments but nobody can retrieve them.

use crate::Stage;

/// Prefix that opens a stage segment
pub const STAGE_SEPARATOR: &str = "---";

/// Whether `arg` is any stage marker
#[must_use]
pub fn is_stage_boundary(arg: &str) -> bool {
    arg.starts_with(STAGE_SEPARATOR)
}

/// Everything before the first stage marker.
pub fn main_arguments<S: AsRef<str>>(args: &[S]) -> &[S] {
    let end = args
        .iter()
        .position(|arg| is_stage_boundary(arg.as_ref()))
        .unwrap_or(args.len());
    &args[..end]
}

/// The program name, or an empty string for an empty argument vector
pub fn command_from_args<S: AsRef<str>>(args: &[S]) -> &str {
    args.first().map_or("", AsRef::as_ref)
}

/// Return the first of `candidates` present in `args`.
///
/// An argument matches a candidate when it equals it, or when it starts with
/// it followed directly by `=` (`--config=path`).
pub fn find_argument<'c, S: AsRef<str>>(args: &[S], candidates: &[&'c str]) -> Option<&'c str> {
    candidates.iter().copied().find(|candidate| {
        args.iter().any(|arg| {
            arg.as_ref()
                .strip_prefix(candidate)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('='))
        })
    })
}

impl Stage {
    /// Whether `arg` is the marker opening this stage's segment.
    ///
    /// The marker token must start with the stage's option token, so
    /// `---config` opens the `conf` segment. `Done` has no option and never
    /// matches.
    #[must_use]
    pub fn is_own_boundary(self, arg: &str) -> bool {
        let option = self.option();
        !option.is_empty()
            && arg
                .strip_prefix(STAGE_SEPARATOR)
                .is_some_and(|token| token.starts_with(option))
    }

    /// The private argument segment of this stage.
    ///
    /// Single left-to-right pass: skip to the first own marker, then take
    /// until the next marker of any kind.
    pub fn filter_arguments<S: AsRef<str>>(self, args: &[S]) -> &[S] {
        let Some(open) = args.iter().position(|arg| self.is_own_boundary(arg.as_ref())) else {
            return &[];
        };
        let rest = &args[open + 1..];
        let len = rest
            .iter()
            .position(|arg| is_stage_boundary(arg.as_ref()))
            .unwrap_or(rest.len());
        &rest[..len]
    }
}
