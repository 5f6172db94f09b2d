//! Jekyll static site adapter

use crate::spec::{BuilderSpec, SpecStage};
use mak_types::Stage;

pub const SPEC: BuilderSpec = BuilderSpec {
    arguments: &["exec", "jekyll", "build"],
    ..BuilderSpec::new("Jekyll", "bundle", &["_config.yml"], SpecStage::Fixed(Stage::Build))
};
