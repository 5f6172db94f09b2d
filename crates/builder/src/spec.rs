//! Static descriptors for the concrete adapters

use mak_platform::WorkDir;
use mak_types::{Environment, Stage};
use std::io;
use std::path::{Path, PathBuf};

/// Relocates the probe root before detection, e.g. to the enclosing git root
pub type RootLocator = fn(&Path) -> Option<PathBuf>;

/// Runs after a failed invocation of the adapter
pub type CleanupHook = fn(&WorkDir, &Environment) -> io::Result<()>;

/// The stage an adapter runs at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecStage {
    Fixed(Stage),
    /// Decided at construction; the adapter participates in every listed stage
    Dynamic(&'static [Stage]),
}

impl SpecStage {
    #[must_use]
    pub fn accepts(self, stage: Stage) -> bool {
        match self {
            Self::Fixed(fixed) => fixed == stage,
            Self::Dynamic(stages) => stages.contains(&stage),
        }
    }

    /// The stage an adapter built for `requested` ends up running at
    #[must_use]
    pub fn resolve(self, requested: Stage) -> Stage {
        match self {
            Self::Fixed(fixed) => fixed,
            Self::Dynamic(stages) if stages.contains(&requested) => requested,
            Self::Dynamic(stages) => stages.first().copied().unwrap_or_default(),
        }
    }
}

/// Static description of one adapter
#[derive(Debug, Clone, Copy)]
pub struct BuilderSpec {
    pub name: &'static str,
    pub command: &'static str,
    /// Detection markers; any one present selects the adapter
    pub build_file: &'static [&'static str],
    pub stage: SpecStage,
    /// Fixed argument prefix placed before the stage arguments
    pub arguments: &'static [&'static str],
    /// Variables imported from the invoking process at construction
    pub import_env: &'static [&'static str],
    /// Prepended to the target, e.g. `--bin=`
    pub target_argument_prefix: Option<&'static str>,
    pub root_locator: Option<RootLocator>,
    pub cleanup: Option<CleanupHook>,
}

impl BuilderSpec {
    /// A build-stage spec with no optional fields set
    pub const fn new(
        name: &'static str,
        command: &'static str,
        build_file: &'static [&'static str],
        stage: SpecStage,
    ) -> Self {
        Self {
            name,
            command,
            build_file,
            stage,
            arguments: &[],
            import_env: &[],
            target_argument_prefix: None,
            root_locator: None,
            cleanup: None,
        }
    }

    /// The directory the adapter would work in, if `root` qualifies.
    ///
    /// Applies the root locator first; a locator that finds nothing
    /// disqualifies the directory.
    #[must_use]
    pub fn detect(&self, root: &WorkDir) -> Option<WorkDir> {
        let root = match self.root_locator {
            Some(locate) => WorkDir::new(locate(root.path())?),
            None => root.clone(),
        };

        let found = self.build_file.iter().any(|marker| root.has_file(marker));
        tracing::trace!(builder = self.name, root = %root.path().display(), found, "probe");
        found.then_some(root)
    }

    /// Target rendered with the adapter's prefix; empty targets produce nothing.
    #[must_use]
    pub fn target_argument(&self, target: &str) -> Option<String> {
        if target.is_empty() {
            return None;
        }
        Some(match self.target_argument_prefix {
            Some(prefix) => format!("{prefix}{target}"),
            None => target.to_string(),
        })
    }

    /// Fixed arguments, skipping empty entries
    pub fn fixed_arguments(&self) -> impl Iterator<Item = String> + '_ {
        self.arguments
            .iter()
            .filter(|arg| !arg.is_empty())
            .map(ToString::to_string)
    }
}
