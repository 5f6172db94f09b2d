//! Cargo (Rust) adapter

use crate::spec::{BuilderSpec, SpecStage};
use mak_types::Stage;

/// `cargo build [stage args] [--bin=<target>]`
pub const SPEC: BuilderSpec = BuilderSpec {
    arguments: &["build"],
    target_argument_prefix: Some("--bin="),
    ..BuilderSpec::new("Cargo", "cargo", &["Cargo.toml"], SpecStage::Fixed(Stage::Build))
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_systems::{BasicBuildSystem, BuildSystem};
    use mak_platform::WorkDir;
    use tempfile::tempdir;

    #[test]
    fn test_cargo_arguments() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("Cargo.toml"), "[package]\n").unwrap();

        let system = BasicBuildSystem::create(&SPEC, &WorkDir::new(temp.path()), Stage::Build, None)
            .unwrap()
            .unwrap();
        let stage_args = vec!["--release".to_string()];
        assert_eq!(
            system.command_line("mak", &stage_args).get_args(),
            ["build", "--release", "--bin=mak"]
        );
        assert_eq!(system.command_line("", &[]).get_args(), ["build"]);
    }
}
