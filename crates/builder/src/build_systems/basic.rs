//! Adapter driven entirely by its specification

use async_trait::async_trait;
use mak_errors::Error;
use mak_platform::WorkDir;
use mak_types::{Environment, Stage};

use super::BuildSystem;
use crate::spec::BuilderSpec;

/// Runs `command <arguments> <stage args> <target>` in the detected root
#[derive(Debug, Clone)]
pub struct BasicBuildSystem {
    spec: &'static BuilderSpec,
    root: WorkDir,
    stage: Stage,
    env: Environment,
}

impl BasicBuildSystem {
    /// Build the adapter for an already detected root.
    ///
    /// Starts from `env` (or an empty environment) and imports the
    /// specification's variables on top.
    #[must_use]
    pub fn new(
        spec: &'static BuilderSpec,
        root: WorkDir,
        stage: Stage,
        env: Option<Environment>,
    ) -> Self {
        let mut env = env.unwrap_or_default();
        env.import_all(spec.import_env.iter().filter(|name| !name.is_empty()));

        Self {
            spec,
            root,
            stage: spec.stage.resolve(stage),
            env,
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
        stage: Stage,
        env: Option<Environment>,
    ) -> Result<Option<Box<dyn BuildSystem>>, Error> {
        Ok(spec
            .detect(root)
            .map(|root| Box::new(Self::new(spec, root, stage, env)) as Box<dyn BuildSystem>))
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }
}

#[async_trait]
impl BuildSystem for BasicBuildSystem {
    fn spec(&self) -> &'static BuilderSpec {
        self.spec
    }

    fn root(&self) -> &WorkDir {
        &self.root
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn environment(&self) -> &Environment {
        &self.env
    }
}
