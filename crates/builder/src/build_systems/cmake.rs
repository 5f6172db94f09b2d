//! CMake configuration adapter
//!
//! Generates a Ninja Multi-Config tree in `BUILD_DIR` (default `build`) and
//! hands over to [`NinjaBuildSystem`](super::NinjaBuildSystem) rooted there.

use async_trait::async_trait;
use mak_errors::Error;
use mak_platform::WorkDir;
use mak_types::{Environment, Stage};
use std::io;

use super::{ninja, BasicBuildSystem, BuildSystem, NinjaBuildSystem};
use crate::spec::{BuilderSpec, SpecStage};

pub const BUILD_DIR_VAR: &str = "BUILD_DIR";
pub const DEFAULT_BUILD_DIR: &str = "build";
const CACHE_FILE: &str = "CMakeCache.txt";

pub const SPEC: BuilderSpec = BuilderSpec {
    import_env: &[
        "CMAKE_BUILD_PARALLEL_LEVEL",
        "CMAKE_BUILD_TYPE",
        "CMAKE_MODULE_PATH",
    ],
    cleanup: Some(remove_cache),
    ..BuilderSpec::new(
        "cmake",
        "cmake",
        &["CMakeLists.txt"],
        SpecStage::Fixed(Stage::Configuration),
    )
};

/// `BUILD_DIR` from `env`, or the default
pub(crate) fn build_dir_of(env: &Environment) -> String {
    env.value(BUILD_DIR_VAR)
        .filter(|dir| !dir.is_empty())
        .unwrap_or(DEFAULT_BUILD_DIR)
        .to_string()
}

/// A failed configure leaves a cache that poisons the next attempt.
fn remove_cache(root: &WorkDir, env: &Environment) -> io::Result<()> {
    let cache = root.path().join(build_dir_of(env)).join(CACHE_FILE);
    match std::fs::remove_file(&cache) {
        Ok(()) => {
            tracing::debug!(path = %cache.display(), "removed stale cache");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Environment handed to a ninja successor in `build_dir`
pub(crate) fn successor_environment(env: &Environment, build_dir: &str) -> Environment {
    let mut next = env.clone();
    next.import("PATH").set(BUILD_DIR_VAR, build_dir);
    next
}

pub struct CMakeBuildSystem {
    base: BasicBuildSystem,
    build_dir: String,
}

impl CMakeBuildSystem {
    #[must_use]
    pub fn new(root: WorkDir, env: Option<Environment>) -> Self {
        let mut base = BasicBuildSystem::new(&SPEC, root, Stage::Configuration, env);
        let build_dir = build_dir_of(base.environment());
        base.environment_mut()
            .set("CMAKE_EXPORT_COMPILE_COMMANDS", true)
            .set("CMAKE_GENERATOR", "Ninja Multi-Config")
            .set(BUILD_DIR_VAR, &build_dir);

        Self { base, build_dir }
    }

    /// Detect and construct
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the registry's factory type.
    pub fn create(
        spec: &'static BuilderSpec,
        root: &WorkDir,
        _stage: Stage,
        env: Option<Environment>,
    ) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        Ok(spec
            .detect(root)
            .map(|root| Box::new(Self::new(root, env)) as Box<dyn BuildSystem>))
    }

    pub fn build_dir(&self) -> &str {
        &self.build_dir
    }
}

#[async_trait]
impl BuildSystem for CMakeBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.base.spec()
    }

    fn root(&self) -> &WorkDir {
        self.base.root()
    }

    fn stage(&self) -> Stage {
        self.base.stage()
    }

    /// Only while the build tree does not exist yet
    fn required(&self) -> bool {
        !self.root().has_folder(&self.build_dir)
    }

    fn environment(&self) -> &Environment {
        self.base.environment()
    }

    fn arguments(&self, _target: &str) -> Vec<String> {
        vec![
            "-S".to_string(),
            self.root().path().display().to_string(),
            "-B".to_string(),
            self.build_dir.clone(),
        ]
    }

    fn target_arguments(&self, _target: &str) -> Vec<String> {
        Vec::new()
    }

    fn next_builder(&self) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        let env = successor_environment(self.environment(), &self.build_dir);
        NinjaBuildSystem::create(
            &ninja::SPEC,
            &self.root().join(&self.build_dir),
            Stage::Build,
            Some(env),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn project() -> (tempfile::TempDir, WorkDir) {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("CMakeLists.txt"), "project(test)\n").unwrap();
        let root = WorkDir::new(temp.path());
        (temp, root)
    }

    #[test]
    fn test_environment_and_arguments() {
        let (temp, root) = project();
        let system = CMakeBuildSystem::new(root, None);

        let env = system.environment();
        assert_eq!(env.value("CMAKE_EXPORT_COMPILE_COMMANDS"), Some("true"));
        assert_eq!(env.value("CMAKE_GENERATOR"), Some("Ninja Multi-Config"));
        assert_eq!(env.value(BUILD_DIR_VAR), Some("build"));

        let cmd = system.command_line("ignored", &["-DFOO=1".to_string()]);
        assert_eq!(cmd.program(), "cmake");
        assert_eq!(
            cmd.get_args(),
            [
                "-S".to_string(),
                temp.path().display().to_string(),
                "-B".to_string(),
                "build".to_string(),
                "-DFOO=1".to_string()
            ]
        );
    }

    #[test]
    fn test_required_until_build_dir_exists() {
        let (temp, root) = project();
        let system = CMakeBuildSystem::new(root, None);
        assert!(system.required());

        std::fs::create_dir(temp.path().join("build")).unwrap();
        assert!(!system.required());
    }

    #[test]
    fn test_build_dir_from_environment() {
        let (_temp, root) = project();
        let mut env = Environment::new();
        env.set(BUILD_DIR_VAR, "out");
        let system = CMakeBuildSystem::new(root, Some(env));
        assert_eq!(system.build_dir(), "out");
    }

    #[test]
    fn test_successor_is_ninja_in_build_dir() {
        let (temp, root) = project();
        let system = CMakeBuildSystem::new(root, None);
        assert!(system.next_builder().unwrap().is_none());

        std::fs::create_dir(temp.path().join("build")).unwrap();
        std::fs::write(temp.path().join("build/build.ninja"), "").unwrap();

        let next = system.next_builder().unwrap().unwrap();
        assert_eq!(next.name(), "ninja");
        assert_eq!(next.stage(), Stage::Build);
        assert_eq!(next.root().path(), temp.path().join("build"));
        assert_eq!(next.environment().value(BUILD_DIR_VAR), Some("build"));
        assert_eq!(
            next.environment().value("CMAKE_GENERATOR"),
            Some("Ninja Multi-Config")
        );
    }

    #[test]
    fn test_cleanup_removes_cache() {
        let (temp, root) = project();
        let system = CMakeBuildSystem::new(root, None);
        std::fs::create_dir(temp.path().join("build")).unwrap();
        std::fs::write(temp.path().join("build").join(CACHE_FILE), "").unwrap();

        system.cleanup().unwrap();
        assert!(!temp.path().join("build").join(CACHE_FILE).exists());
        // idempotent
        system.cleanup().unwrap();
    }
}
