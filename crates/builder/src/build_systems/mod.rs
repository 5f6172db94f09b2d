//! Build system abstraction and implementations
//!
//! Every adapter implements [`BuildSystem`]. Adapters that only differ in
//! their static [`BuilderSpec`] share [`BasicBuildSystem`]; the others wrap it
//! and override what they need (required-ness, arguments, successor).
//!
//! The [`BuildSystemRegistry`] holds one entry per adapter in priority order,
//! more specific tools first, generic fallbacks last.

use async_trait::async_trait;
use mak_errors::{BuildError, Error};
use mak_platform::{PlatformCommand, ProcessOperations, WorkDir};
use mak_types::{Environment, ExecutionResult, Stage};
use std::path::PathBuf;

use crate::builder::Builder;
use crate::spec::BuilderSpec;

mod basic;
pub mod cargo;
pub mod cmake;
pub mod cmake_preset;
pub mod conan;
pub mod gradle;
pub mod jekyll;
pub mod make;
pub mod meson;
pub mod ninja;

pub use basic::BasicBuildSystem;
pub use cmake::CMakeBuildSystem;
pub use cmake_preset::CMakePresetBuildSystem;
pub use conan::ConanBuildSystem;
pub use meson::MesonBuildSystem;
pub use ninja::NinjaBuildSystem;

/// Trait for build system implementations
#[async_trait]
pub trait BuildSystem: Send + Sync {
    fn spec(&self) -> &'static BuilderSpec;

    fn name(&self) -> &str {
        self.spec().name
    }

    /// Directory the adapter was detected in
    fn root(&self) -> &WorkDir;

    fn stage(&self) -> Stage;

    /// Whether the adapter has work to do; when false the driver moves on to
    /// the successor without running it
    fn required(&self) -> bool {
        true
    }

    fn environment(&self) -> &Environment;

    fn command(&self, _target: &str) -> String {
        self.spec().command.to_string()
    }

    /// Arguments placed before the stage arguments
    fn arguments(&self, _target: &str) -> Vec<String> {
        self.spec().fixed_arguments().collect()
    }

    /// Arguments placed after the stage arguments
    fn target_arguments(&self, target: &str) -> Vec<String> {
        self.spec().target_argument(target).into_iter().collect()
    }

    fn working_directory(&self, _target: &str) -> PathBuf {
        self.root().path().to_path_buf()
    }

    /// A new, caller-owned adapter for the next step of the chain
    ///
    /// # Errors
    ///
    /// Returns an error if the successor cannot be constructed.
    fn next_builder(&self) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        Ok(None)
    }

    /// Undo partial state after a failed run
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup hook fails.
    fn cleanup(&self) -> Result<(), Error> {
        match self.spec().cleanup {
            Some(hook) => hook(self.root(), self.environment()).map_err(|e| {
                Error::from(BuildError::CleanupFailed {
                    builder: self.name().to_string(),
                    message: e.to_string(),
                })
            }),
            None => Ok(()),
        }
    }

    /// Full invocation: fixed arguments, stage arguments, then target arguments
    fn command_line(&self, target: &str, stage_args: &[String]) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(&self.command(target));
        cmd.args(self.arguments(target))
            .args(stage_args)
            .args(self.target_arguments(target))
            .current_dir(self.working_directory(target))
            .environment(self.environment());
        cmd
    }

    async fn run(
        &self,
        process: &dyn ProcessOperations,
        target: &str,
        stage_args: &[String],
    ) -> ExecutionResult {
        process
            .execute_command(self.command_line(target, stage_args))
            .await
    }
}

/// Constructs an adapter for `spec` if the directory qualifies
pub type Factory = fn(
    &'static BuilderSpec,
    &WorkDir,
    Stage,
    Option<Environment>,
) -> Result<Option<Box<dyn BuildSystem>>, Error>;

/// A specification paired with its factory
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub spec: &'static BuilderSpec,
    factory: Factory,
}

impl RegistryEntry {
    pub const fn new(spec: &'static BuilderSpec, factory: Factory) -> Self {
        Self { spec, factory }
    }

    #[must_use]
    pub fn accepts_stage(&self, stage: Stage) -> bool {
        self.spec.stage.accepts(stage)
    }

    /// Run the factory for this entry
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter detected its files but could not load
    /// them.
    pub fn create(
        &self,
        root: &WorkDir,
        stage: Stage,
        env: Option<Environment>,
    ) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        (self.factory)(self.spec, root, stage, env)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.spec.name)
            .field("stage", &self.spec.stage)
            .finish()
    }
}

/// Registry of available build systems
#[derive(Debug, Clone)]
pub struct BuildSystemRegistry {
    entries: Vec<RegistryEntry>,
}

impl BuildSystemRegistry {
    /// Create a new registry with all supported build systems
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![
                RegistryEntry::new(&conan::SPEC, ConanBuildSystem::create),
                RegistryEntry::new(&cmake_preset::SPEC, CMakePresetBuildSystem::create),
                RegistryEntry::new(&cmake::SPEC, CMakeBuildSystem::create),
                RegistryEntry::new(&meson::SPEC, MesonBuildSystem::create),
                RegistryEntry::new(&ninja::SPEC, NinjaBuildSystem::create),
                RegistryEntry::new(&cargo::SPEC, BasicBuildSystem::create),
                RegistryEntry::new(&gradle::SPEC, BasicBuildSystem::create),
                RegistryEntry::new(&jekyll::SPEC, BasicBuildSystem::create),
                RegistryEntry::new(&make::GNUMAKE_SPEC, BasicBuildSystem::create),
                RegistryEntry::new(&make::SPEC, BasicBuildSystem::create),
            ],
        }
    }

    /// A registry with a custom entry list, in priority order
    #[must_use]
    pub fn with_entries(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Get a specific entry by adapter name
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.spec.name.eq_ignore_ascii_case(name))
    }

    /// First adapter accepting `stage` whose detection succeeds in `root`.
    ///
    /// Returns an empty [`Builder`] when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a matching adapter fails to load its configuration.
    pub fn select(
        &self,
        root: &WorkDir,
        stage: Stage,
        env: Option<&Environment>,
    ) -> Result<Builder, Error> {
        for entry in self.entries.iter().filter(|entry| entry.accepts_stage(stage)) {
            if let Some(system) = entry.create(root, stage, env.cloned())? {
                tracing::debug!(
                    builder = system.name(),
                    stage = %stage,
                    root = %system.root().path().display(),
                    required = system.required(),
                    "selected build system"
                );
                return Ok(Builder::new(system));
            }
        }

        tracing::debug!(stage = %stage, root = %root.path().display(), "no build system");
        Ok(Builder::default())
    }
}

impl Default for BuildSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_priority_order() {
        let registry = BuildSystemRegistry::new();
        let names: Vec<_> = registry.entries().iter().map(|e| e.spec.name).collect();
        assert_eq!(
            names,
            [
                "conan",
                "cmake - preset",
                "cmake",
                "Meson",
                "ninja",
                "Cargo",
                "gradle",
                "Jekyll",
                "gnumake",
                "make"
            ]
        );
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let registry = BuildSystemRegistry::new();
        assert_eq!(registry.get("CMAKE").map(|e| e.spec.name), Some("cmake"));
        assert!(registry.get("bazel").is_none());
    }

    #[test]
    fn test_select_filters_by_stage() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("Makefile"), "all:\n").unwrap();
        let root = WorkDir::new(temp.path());
        let registry = BuildSystemRegistry::new();

        let found = registry.select(&root, Stage::Build, None).unwrap();
        assert_eq!(found.name(), "make");

        let none = registry.select(&root, Stage::Configuration, None).unwrap();
        assert!(!none.is_found());
        assert_eq!(none.stage(), Stage::Done);
    }

    #[test]
    fn test_specific_before_generic() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("Makefile"), "all:\n").unwrap();
        std::fs::write(temp.path().join("build.ninja"), "").unwrap();
        let root = WorkDir::new(temp.path());

        let found = BuildSystemRegistry::new()
            .select(&root, Stage::Build, None)
            .unwrap();
        assert_eq!(found.name(), "ninja");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("CMakeLists.txt"), "").unwrap();
        std::fs::write(temp.path().join("meson.build"), "").unwrap();
        let root = WorkDir::new(temp.path());
        let registry = BuildSystemRegistry::new();

        let first = registry.select(&root, Stage::Configuration, None).unwrap();
        for _ in 0..5 {
            let again = registry.select(&root, Stage::Configuration, None).unwrap();
            assert_eq!(again.name(), first.name());
        }
        assert_eq!(first.name(), "cmake");
    }
}
