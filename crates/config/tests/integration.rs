//! Integration tests for config

#[cfg(test)]
mod tests {
    use mak_config::*;
    use mak_types::ColorChoice;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for name in [
            constants::ENV_BUILD_DIR,
            constants::ENV_COLOR,
            constants::ENV_IMPORT_ENV,
            constants::ENV_CONAN_PROFILE,
            constants::BUILD_DIR_VAR,
        ] {
            std::env::remove_var(name);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
color = "never"

[build]
build_dir = "out"
import_env = ["PATH", "HOME"]
conan_profile = "clang"
conan_build_types = ["Debug", "Release"]
use_git_root = false
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.build.build_dir.as_deref(), Some("out"));
        assert_eq!(config.build.import_env, ["PATH", "HOME"]);
        assert_eq!(config.build.conan_profile.as_deref(), Some("clang"));
        assert_eq!(config.build.conan_build_types, ["Debug", "Release"]);
        assert!(!config.build.use_git_root);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[build]\nbuild_dir = \"out\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.build.build_dir.as_deref(), Some("out"));
        assert_eq!(config.build.conan_build_types, ["Debug"]);
        assert!(config.build.use_git_root);
        assert_eq!(config.general, GeneralConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[build\nbuild_dir = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            mak_errors::Error::Config(mak_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = Config::load_or_default(Some(missing.as_path())).await.unwrap_err();
        assert!(matches!(
            err,
            mak_errors::Error::Config(mak_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, mak_errors::Error::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_ambient_build_dir_is_used_when_unset() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::BUILD_DIR_VAR, "out");
        let env = Config::default().environment();
        assert_eq!(env.value(constants::BUILD_DIR_VAR), Some("out"));

        clear_env();
    }

    #[test]
    fn test_explicit_build_dir_shadows_ambient() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::BUILD_DIR_VAR, "out");
        std::env::set_var(constants::ENV_BUILD_DIR, "cmake-out");
        let mut config = Config::default();
        config.merge_env().unwrap();
        let env = config.environment();
        assert_eq!(env.value(constants::BUILD_DIR_VAR), Some("cmake-out"));

        clear_env();
        let env = Config::default().environment();
        assert_eq!(env.value(constants::BUILD_DIR_VAR), None);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::ENV_BUILD_DIR, "cmake-out");
        std::env::set_var(constants::ENV_COLOR, "always");
        std::env::set_var(constants::ENV_IMPORT_ENV, "PATH,VCPKG_ROOT");
        std::env::set_var(constants::ENV_CONAN_PROFILE, "gcc");

        let mut config = Config::default();
        let before = config.build.import_env.len();
        config.merge_env().unwrap();

        assert_eq!(config.build.build_dir.as_deref(), Some("cmake-out"));
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.build.import_env.len(), before + 1);
        assert_eq!(config.build.import_env.last().map(String::as_str), Some("VCPKG_ROOT"));
        assert_eq!(config.build.conan_profile.as_deref(), Some("gcc"));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::ENV_COLOR, "sometimes");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }
}
