//! Meson configuration adapter

use async_trait::async_trait;
use mak_errors::Error;
use mak_platform::WorkDir;
use mak_types::{Environment, Stage};

use super::cmake::{build_dir_of, successor_environment, BUILD_DIR_VAR};
use super::{ninja, BasicBuildSystem, BuildSystem, NinjaBuildSystem};
use crate::spec::{BuilderSpec, SpecStage};

pub const SPEC: BuilderSpec = BuilderSpec::new(
    "Meson",
    "meson",
    &["meson.build"],
    SpecStage::Fixed(Stage::Configuration),
);

/// `meson setup <build_dir>`, followed by ninja in the build directory
pub struct MesonBuildSystem {
    base: BasicBuildSystem,
    build_dir: String,
}

impl MesonBuildSystem {
    #[must_use]
    pub fn new(root: WorkDir, env: Option<Environment>) -> Self {
        let mut base = BasicBuildSystem::new(&SPEC, root, Stage::Configuration, env);
        let build_dir = build_dir_of(base.environment());
        base.environment_mut().set(BUILD_DIR_VAR, &build_dir);
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
}

#[async_trait]
impl BuildSystem for MesonBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.base.spec()
    }

    fn root(&self) -> &WorkDir {
        self.base.root()
    }

    fn stage(&self) -> Stage {
        self.base.stage()
    }

    // setup refuses to run twice on the same directory
    fn required(&self) -> bool {
        !self.root().has_folder(&self.build_dir)
    }

    fn environment(&self) -> &Environment {
        self.base.environment()
    }

    fn arguments(&self, _target: &str) -> Vec<String> {
        vec!["setup".to_string(), self.build_dir.clone()]
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
