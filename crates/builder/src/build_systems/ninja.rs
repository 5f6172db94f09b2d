//! Ninja adapter
//!
//! Usually reached as the successor of a configuration tool, rooted in the
//! build directory that tool generated.

use async_trait::async_trait;
use mak_errors::Error;
use mak_platform::WorkDir;
use mak_types::{Environment, Stage};

use super::{BasicBuildSystem, BuildSystem};
use crate::spec::{BuilderSpec, SpecStage};

/// Alternative build file, relative to the ninja root
pub const BUILD_FILE_VAR: &str = "NINJA_FILE";
/// Default target when none is given on the command line
pub const BUILD_TARGET_VAR: &str = "BUILD_TARGET";

pub const SPEC: BuilderSpec = BuilderSpec {
    import_env: &[BUILD_TARGET_VAR, BUILD_FILE_VAR],
    ..BuilderSpec::new("ninja", "ninja", &["build.ninja"], SpecStage::Fixed(Stage::Build))
};

pub struct NinjaBuildSystem {
    base: BasicBuildSystem,
}

impl NinjaBuildSystem {
    #[must_use]
    pub fn new(root: WorkDir, env: Option<Environment>) -> Self {
        Self {
            base: BasicBuildSystem::new(&SPEC, root, Stage::Build, env),
        }
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

    fn build_file(&self) -> Option<&str> {
        self.environment()
            .value(BUILD_FILE_VAR)
            .filter(|file| !file.is_empty() && self.root().has_file(file))
    }
}

#[async_trait]
impl BuildSystem for NinjaBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.base.spec()
    }

    fn root(&self) -> &WorkDir {
        self.base.root()
    }

    fn stage(&self) -> Stage {
        self.base.stage()
    }

    fn environment(&self) -> &Environment {
        self.base.environment()
    }

    fn arguments(&self, _target: &str) -> Vec<String> {
        match self.build_file() {
            Some(file) => vec![
                "-f".to_string(),
                self.root().path().join(file).display().to_string(),
            ],
            None => Vec::new(),
        }
    }

    fn target_arguments(&self, target: &str) -> Vec<String> {
        let target = if target.is_empty() {
            self.environment().value(BUILD_TARGET_VAR).unwrap_or_default()
        } else {
            target
        };
        self.spec().target_argument(target).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ninja_root() -> (tempfile::TempDir, WorkDir) {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("build.ninja"), "").unwrap();
        let root = WorkDir::new(temp.path());
        (temp, root)
    }

    #[test]
    fn test_plain_invocation() {
        let (_temp, root) = ninja_root();
        let system = NinjaBuildSystem::new(root, Some(Environment::new()));
        assert!(system.arguments("").is_empty());
        assert_eq!(system.command_line("all", &[]).get_args(), ["all"]);
    }

    #[test]
    fn test_alternate_build_file() {
        let (temp, root) = ninja_root();
        std::fs::write(temp.path().join("build-Debug.ninja"), "").unwrap();

        let mut env = Environment::new();
        env.set(BUILD_FILE_VAR, "build-Debug.ninja");
        let system = NinjaBuildSystem::new(root, Some(env));

        let args = system.arguments("");
        assert_eq!(args[0], "-f");
        assert!(args[1].ends_with("build-Debug.ninja"));
    }

    #[test]
    fn test_missing_build_file_is_ignored() {
        let (_temp, root) = ninja_root();
        let mut env = Environment::new();
        env.set(BUILD_FILE_VAR, "absent.ninja");
        let system = NinjaBuildSystem::new(root, Some(env));
        assert!(system.arguments("").is_empty());
    }

    #[test]
    fn test_default_target_from_environment() {
        let (_temp, root) = ninja_root();
        let mut env = Environment::new();
        env.set(BUILD_TARGET_VAR, "tests");
        let system = NinjaBuildSystem::new(root, Some(env));
        assert_eq!(system.target_arguments(""), ["tests"]);
        assert_eq!(system.target_arguments("app"), ["app"]);
    }
}
