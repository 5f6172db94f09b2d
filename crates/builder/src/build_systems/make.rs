//! Makefile adapters

use crate::spec::{BuilderSpec, SpecStage};
use mak_types::Stage;

pub const SPEC: BuilderSpec =
    BuilderSpec::new("make", "make", &["Makefile"], SpecStage::Fixed(Stage::Build));

pub const GNUMAKE_SPEC: BuilderSpec = BuilderSpec::new(
    "gnumake",
    "gmake",
    &["GNUmakefile"],
    SpecStage::Fixed(Stage::Build),
);
