//! CMake preset adapter
//!
//! Runs configure, build and test through `cmake --preset`,
//! `cmake --build --preset` and `ctest --preset`. The preset for a step is
//! the target when it names a preset of that category, otherwise
//! `CMAKE_PRESET`, otherwise the first preset of the category.

use async_trait::async_trait;
use mak_errors::{BuildError, Error};
use mak_platform::{ProcessOperations, WorkDir};
use mak_types::{Environment, ExecutionResult, Stage};

use super::{BasicBuildSystem, BuildSystem};
use crate::presets::{PresetCatalog, PresetCategory};
use crate::spec::{BuilderSpec, SpecStage};

pub const PRESET_VAR: &str = "CMAKE_PRESET";

pub const PRESET_FILES: &[&str] = &["CMakeUserPresets.json", "CMakePresets.json"];

pub const SPEC: BuilderSpec = BuilderSpec {
    import_env: &[PRESET_VAR],
    ..BuilderSpec::new(
        "cmake - preset",
        "cmake",
        PRESET_FILES,
        SpecStage::Dynamic(&[Stage::Configuration, Stage::Build, Stage::Test]),
    )
};

pub struct CMakePresetBuildSystem {
    base: BasicBuildSystem,
    catalog: PresetCatalog,
}

impl CMakePresetBuildSystem {
    /// Construct for `stage`, loading the catalog from the preset files in
    /// `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a preset file is malformed.
    pub fn new(root: WorkDir, stage: Stage, env: Option<Environment>) -> Result<Self, Error> {
        let files: Vec<_> = PRESET_FILES.iter().map(|file| root.path().join(file)).collect();
        let catalog = PresetCatalog::load(&files)?;
        Ok(Self::with_catalog(root, stage, env, catalog))
    }

    #[must_use]
    pub fn with_catalog(
        root: WorkDir,
        stage: Stage,
        env: Option<Environment>,
        catalog: PresetCatalog,
    ) -> Self {
        Self {
            base: BasicBuildSystem::new(&SPEC, root, stage, env),
            catalog,
        }
    }

    /// Detect and construct
    ///
    /// # Errors
    ///
    /// Returns an error if a preset file is malformed.
    pub fn create(
        spec: &'static BuilderSpec,
        root: &WorkDir,
        stage: Stage,
        env: Option<Environment>,
    ) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        match spec.detect(root) {
            Some(root) => Ok(Some(
                Box::new(Self::new(root, stage, env)?) as Box<dyn BuildSystem>
            )),
            None => Ok(None),
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn category(&self) -> PresetCategory {
        match self.stage() {
            Stage::Build => PresetCategory::Build,
            Stage::Test => PresetCategory::Test,
            _ => PresetCategory::Configure,
        }
    }

    /// The preset this step runs with
    #[must_use]
    pub fn preset<'a>(&'a self, target: &'a str) -> Option<&'a str> {
        let category = self.category();
        if self.catalog.contains(category, target) {
            return Some(target);
        }
        if let Some(preset) = self.environment().value(PRESET_VAR) {
            if self.catalog.contains(category, preset) {
                return Some(preset);
            }
        }
        self.catalog.first(category)
    }
}

#[async_trait]
impl BuildSystem for CMakePresetBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.base.spec()
    }

    fn root(&self) -> &WorkDir {
        self.base.root()
    }

    fn stage(&self) -> Stage {
        self.base.stage()
    }

    /// Only when the catalog has presets for this step
    fn required(&self) -> bool {
        !self.catalog.presets(self.category()).is_empty()
    }

    fn environment(&self) -> &Environment {
        self.base.environment()
    }

    fn command(&self, _target: &str) -> String {
        match self.stage() {
            Stage::Test => "ctest".to_string(),
            _ => self.spec().command.to_string(),
        }
    }

    fn arguments(&self, target: &str) -> Vec<String> {
        let mut args = Vec::new();
        if self.stage() == Stage::Build {
            args.push("--build".to_string());
        }
        args.push("--preset".to_string());
        args.extend(self.preset(target).map(str::to_string));
        args
    }

    fn target_arguments(&self, _target: &str) -> Vec<String> {
        Vec::new()
    }

    fn next_builder(&self) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        let next = match self.stage() {
            Stage::Configuration => Stage::Build,
            Stage::Build => Stage::Test,
            _ => return Ok(None),
        };
        let successor = Self::with_catalog(
            self.root().clone(),
            next,
            Some(self.environment().clone()),
            self.catalog.clone(),
        );
        Ok(Some(Box::new(successor)))
    }

    async fn run(
        &self,
        process: &dyn ProcessOperations,
        target: &str,
        stage_args: &[String],
    ) -> ExecutionResult {
        if self.preset(target).is_none() {
            let error = BuildError::PresetNotFound {
                preset: format!("{} preset for `{target}`", self.category()),
            };
            return ExecutionResult::failure(error.to_string());
        }
        process
            .execute_command(self.command_line(target, stage_args))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PRESETS: &str = r#"{
        "version": 6,
        "configurePresets": [{"name": "debug"}, {"name": "release"}],
        "buildPresets": [{"name": "debug-build"}, {"name": "release-build"}],
        "testPresets": [{"name": "debug-test"}]
    }"#;

    fn project() -> (tempfile::TempDir, WorkDir) {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("CMakePresets.json"), PRESETS).unwrap();
        let root = WorkDir::new(temp.path());
        (temp, root)
    }

    #[test]
    fn test_stage_from_request() {
        let (_temp, root) = project();
        let system = CMakePresetBuildSystem::create(&SPEC, &root, Stage::Build, None)
            .unwrap()
            .unwrap();
        assert_eq!(system.stage(), Stage::Build);
        assert!(system.required());
    }

    #[test]
    fn test_commands_per_stage() {
        let (_temp, root) = project();
        let configure = CMakePresetBuildSystem::new(root.clone(), Stage::Configuration, None).unwrap();
        assert_eq!(configure.command(""), "cmake");
        assert_eq!(configure.arguments(""), ["--preset", "debug"]);
        assert_eq!(configure.arguments("release"), ["--preset", "release"]);

        let build = CMakePresetBuildSystem::new(root.clone(), Stage::Build, None).unwrap();
        assert_eq!(build.arguments("release-build"), ["--build", "--preset", "release-build"]);
        // a configure preset name is not a build preset
        assert_eq!(build.arguments("release"), ["--build", "--preset", "debug-build"]);

        let test = CMakePresetBuildSystem::new(root, Stage::Test, None).unwrap();
        assert_eq!(test.command(""), "ctest");
        assert_eq!(test.arguments(""), ["--preset", "debug-test"]);
    }

    #[test]
    fn test_preset_from_environment() {
        let (_temp, root) = project();
        let mut env = Environment::new();
        env.set(PRESET_VAR, "release");
        let system = CMakePresetBuildSystem::new(root, Stage::Configuration, Some(env)).unwrap();
        assert_eq!(system.preset(""), Some("release"));
        assert_eq!(system.preset("debug"), Some("debug"));
    }

    #[test]
    fn test_successor_cycle() {
        let (_temp, root) = project();
        let configure = CMakePresetBuildSystem::new(root, Stage::Configuration, None).unwrap();

        let build = configure.next_builder().unwrap().unwrap();
        assert_eq!(build.stage(), Stage::Build);
        let test = build.next_builder().unwrap().unwrap();
        assert_eq!(test.stage(), Stage::Test);
        assert!(test.next_builder().unwrap().is_none());
    }

    #[test]
    fn test_not_required_without_presets() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("CMakePresets.json"),
            r#"{"configurePresets": [{"name": "only"}]}"#,
        )
        .unwrap();
        let system =
            CMakePresetBuildSystem::new(WorkDir::new(temp.path()), Stage::Test, None).unwrap();
        assert!(!system.required());
        assert_eq!(system.preset(""), None);
    }
}
