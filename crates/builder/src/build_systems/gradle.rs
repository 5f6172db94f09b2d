//! Gradle wrapper adapter
//!
//! The wrapper script usually lives at the repository root, so detection
//! starts from the enclosing git checkout.

use crate::spec::{BuilderSpec, SpecStage};
use mak_platform::find_git_root;
use mak_types::Stage;

pub const SPEC: BuilderSpec = BuilderSpec {
    arguments: &["assemble"],
    root_locator: Some(find_git_root),
    ..BuilderSpec::new("gradle", "./gradlew", &["gradlew"], SpecStage::Fixed(Stage::Build))
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_systems::{BasicBuildSystem, BuildSystem};
    use mak_platform::WorkDir;
    use tempfile::tempdir;

    #[test]
    fn test_gradle_runs_from_git_root() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join("gradlew"), "#!/bin/sh\n").unwrap();
        let module = temp.path().join("app");
        std::fs::create_dir(&module).unwrap();

        let system = BasicBuildSystem::create(&SPEC, &WorkDir::new(&module), Stage::Build, None)
            .unwrap()
            .unwrap();
        assert_eq!(system.root().path(), temp.path());
        assert_eq!(system.command(""), "./gradlew");
        assert_eq!(system.arguments(""), ["assemble"]);
    }

    #[test]
    fn test_wrapper_must_sit_at_git_root() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        let module = temp.path().join("app");
        std::fs::create_dir(&module).unwrap();
        std::fs::write(module.join("gradlew"), "#!/bin/sh\n").unwrap();

        assert!(SPEC.detect(&WorkDir::new(&module)).is_none());
    }

    #[test]
    fn test_no_checkout_no_gradle() {
        fn outside_checkout(_: &std::path::Path) -> Option<std::path::PathBuf> {
            None
        }

        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("gradlew"), "#!/bin/sh\n").unwrap();
        let detached = BuilderSpec {
            root_locator: Some(outside_checkout),
            ..SPEC
        };
        assert!(detached.detect(&WorkDir::new(temp.path())).is_none());
    }
}
