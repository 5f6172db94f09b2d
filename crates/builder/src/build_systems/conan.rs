//! Conan dependency adapter
//!
//! Installs dependencies for every configured build type whose build
//! environment script has not been generated yet, then hands over to the
//! preset adapter at the configuration stage.

use async_trait::async_trait;
use mak_errors::Error;
use mak_platform::{PlatformCommand, ProcessOperations, WorkDir};
use mak_types::{Environment, ExecutionResult, Stage};
use std::path::PathBuf;

use super::cmake::BUILD_DIR_VAR;
use super::{cmake_preset, BasicBuildSystem, BuildSystem, CMakePresetBuildSystem};
use crate::spec::{BuilderSpec, SpecStage};

pub const PROFILE_VAR: &str = "CURRENT_PROFILE";
/// Comma separated build types, e.g. `Debug,Release`
pub const BUILD_TYPES_VAR: &str = "CONAN_BUILD_TYPES";
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

pub const SPEC: BuilderSpec = BuilderSpec {
    import_env: &["PATH", "LD_LIBRARY_PATH", "CONAN_HOME"],
    ..BuilderSpec::new(
        "conan",
        "conan",
        &["conanfile.txt", "conanfile.py"],
        SpecStage::Fixed(Stage::PreRequisites),
    )
};

/// Where a profile's generated files land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConanProfile {
    pub name: &'static str,
    pub build_dir: &'static str,
    /// Below `build_dir`
    pub generator_dir: &'static str,
}

pub const PROFILES: [ConanProfile; 2] = [
    ConanProfile {
        name: "gcc",
        build_dir: "build",
        generator_dir: "gcc/generators",
    },
    ConanProfile {
        name: "clang",
        build_dir: "build_clang",
        generator_dir: "clang/generators",
    },
];

/// The profile named `name`, falling back to the first one
#[must_use]
pub fn find_profile(name: &str) -> &'static ConanProfile {
    PROFILES
        .iter()
        .find(|profile| profile.name == name)
        .unwrap_or(&PROFILES[0])
}

/// Prefix of the build environment script conan writes for `build_type`
fn env_script(build_type: &str) -> String {
    format!("conanbuildenv-{}", build_type.to_lowercase())
}

pub struct ConanBuildSystem {
    base: BasicBuildSystem,
    profile: &'static ConanProfile,
    build_types: Vec<String>,
}

impl ConanBuildSystem {
    #[must_use]
    pub fn new(root: WorkDir, env: Option<Environment>) -> Self {
        let mut base = BasicBuildSystem::new(&SPEC, root, Stage::PreRequisites, env);

        let profile = find_profile(base.environment().value(PROFILE_VAR).unwrap_or_default());
        let mut build_types: Vec<String> = base
            .environment()
            .value(BUILD_TYPES_VAR)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if build_types.is_empty() {
            build_types.push(DEFAULT_BUILD_TYPE.to_string());
        }

        base.environment_mut()
            .set(PROFILE_VAR, profile.name)
            .set(BUILD_DIR_VAR, profile.build_dir);

        Self {
            base,
            profile,
            build_types,
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

    pub fn profile(&self) -> &'static ConanProfile {
        self.profile
    }

    pub fn generator_path(&self) -> PathBuf {
        self.root()
            .path()
            .join(self.profile.build_dir)
            .join(self.profile.generator_dir)
    }

    /// Whether `build_type` still lacks its generated build environment
    #[must_use]
    pub fn is_needed(&self, build_type: &str) -> bool {
        let script = env_script(build_type);
        let Ok(entries) = std::fs::read_dir(self.generator_path()) else {
            return true;
        };
        !entries
            .filter_map(Result::ok)
            .any(|entry| entry.file_name().to_string_lossy().starts_with(&script))
    }

    /// Build types an install run would generate
    pub fn pending_build_types(&self) -> impl Iterator<Item = &str> {
        self.build_types
            .iter()
            .map(String::as_str)
            .filter(|build_type| self.is_needed(build_type))
    }

    fn install_arguments(&self, build_type: &str) -> Vec<String> {
        vec![
            "install".to_string(),
            "--build=missing".to_string(),
            format!("--profile:all={}", self.profile.name),
            "-s".to_string(),
            format!("build_type={build_type}"),
            self.root().path().display().to_string(),
        ]
    }

    fn install_command(&self, build_type: &str, stage_args: &[String]) -> PlatformCommand {
        let mut cmd = PlatformCommand::new(self.spec().command);
        cmd.args(self.install_arguments(build_type))
            .args(stage_args)
            .current_dir(self.root().path())
            .environment(self.environment());
        cmd
    }
}

#[async_trait]
impl BuildSystem for ConanBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.base.spec()
    }

    fn root(&self) -> &WorkDir {
        self.base.root()
    }

    fn stage(&self) -> Stage {
        self.base.stage()
    }

    fn required(&self) -> bool {
        self.pending_build_types().next().is_some()
    }

    fn environment(&self) -> &Environment {
        self.base.environment()
    }

    /// Arguments of the first pending install
    fn arguments(&self, _target: &str) -> Vec<String> {
        let build_type = self
            .pending_build_types()
            .next()
            .unwrap_or(DEFAULT_BUILD_TYPE);
        self.install_arguments(build_type)
    }

    fn target_arguments(&self, _target: &str) -> Vec<String> {
        Vec::new()
    }

    fn next_builder(&self) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        CMakePresetBuildSystem::create(
            &cmake_preset::SPEC,
            self.root(),
            Stage::Configuration,
            Some(self.environment().clone()),
        )
    }

    /// One install per pending build type, merged
    async fn run(
        &self,
        process: &dyn ProcessOperations,
        _target: &str,
        stage_args: &[String],
    ) -> ExecutionResult {
        let pending: Vec<String> = self.pending_build_types().map(str::to_string).collect();
        if pending.is_empty() {
            return ExecutionResult::not_needed();
        }

        let mut results = Vec::with_capacity(pending.len());
        for build_type in &pending {
            tracing::info!(profile = self.profile.name, build_type = %build_type, "installing dependencies");
            results.push(
                process
                    .execute_command(self.install_command(build_type, stage_args))
                    .await,
            );
        }
        ExecutionResult::merge(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn project() -> (tempfile::TempDir, WorkDir) {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("conanfile.txt"), "[requires]\n").unwrap();
        let root = WorkDir::new(temp.path());
        (temp, root)
    }

    fn env_with(pairs: &[(&str, &str)]) -> Environment {
        let mut env = Environment::new();
        for (name, value) in pairs {
            env.set(name, value);
        }
        env
    }

    #[test]
    fn test_profile_selection() {
        assert_eq!(find_profile("clang").build_dir, "build_clang");
        assert_eq!(find_profile("msvc").name, "gcc");

        let (_temp, root) = project();
        let system = ConanBuildSystem::new(root, Some(env_with(&[(PROFILE_VAR, "clang")])));
        assert_eq!(system.profile().name, "clang");
        assert_eq!(system.environment().value(BUILD_DIR_VAR), Some("build_clang"));
        assert_eq!(system.environment().value(PROFILE_VAR), Some("clang"));
    }

    #[test]
    fn test_install_arguments() {
        let (temp, root) = project();
        let system = ConanBuildSystem::new(root, None);
        assert_eq!(
            system.arguments(""),
            [
                "install".to_string(),
                "--build=missing".to_string(),
                "--profile:all=gcc".to_string(),
                "-s".to_string(),
                "build_type=Debug".to_string(),
                temp.path().display().to_string(),
            ]
        );
    }

    #[test]
    fn test_required_until_scripts_exist() {
        let (temp, root) = project();
        let system = ConanBuildSystem::new(
            root,
            Some(env_with(&[(BUILD_TYPES_VAR, "Debug, Release")])),
        );
        assert!(system.required());
        assert_eq!(system.pending_build_types().collect::<Vec<_>>(), ["Debug", "Release"]);

        let generators = temp.path().join("build/gcc/generators");
        std::fs::create_dir_all(&generators).unwrap();
        std::fs::write(generators.join("conanbuildenv-debug-x86_64.sh"), "").unwrap();
        assert_eq!(system.pending_build_types().collect::<Vec<_>>(), ["Release"]);

        std::fs::write(generators.join("conanbuildenv-release-x86_64.sh"), "").unwrap();
        assert!(!system.required());
    }

    #[test]
    fn test_successor_is_preset_configuration() {
        let (temp, root) = project();
        let system = ConanBuildSystem::new(root, None);
        assert!(system.next_builder().unwrap().is_none());

        std::fs::write(
            temp.path().join("CMakeUserPresets.json"),
            r#"{"configurePresets": [{"name": "conan-debug"}]}"#,
        )
        .unwrap();
        let next = system.next_builder().unwrap().unwrap();
        assert_eq!(next.name(), "cmake - preset");
        assert_eq!(next.stage(), Stage::Configuration);
        assert_eq!(next.environment().value(PROFILE_VAR), Some("gcc"));
    }
}
