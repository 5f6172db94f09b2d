#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for mak
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/mak/config.toml)
//! - Environment variables
//! - CLI flags (applied by the caller)

pub mod constants;

use mak_errors::{ConfigError, Error};
use mak_types::{ColorChoice, Environment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    /// Out-of-source build directory, relative to the project root. Unset
    /// leaves an ambient `BUILD_DIR` in charge; adapters default to `build`.
    #[serde(default)]
    pub build_dir: Option<String>,
    /// Variables imported from the invoking shell
    #[serde(default = "default_import_env")]
    pub import_env: Vec<String>,
    /// Dependency manager profile (`gcc`, `clang`)
    #[serde(default)]
    pub conan_profile: Option<String>,
    #[serde(default = "default_conan_build_types")]
    pub conan_build_types: Vec<String>,
    /// Relocate the project root to the enclosing git checkout
    #[serde(default = "default_use_git_root")]
    pub use_git_root: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build_dir: None,
            import_env: default_import_env(),
            conan_profile: None,
            conan_build_types: default_conan_build_types(),
            use_git_root: default_use_git_root(),
        }
    }
}

fn default_import_env() -> Vec<String> {
    constants::DEFAULT_IMPORT_ENV
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_conan_build_types() -> Vec<String> {
    vec![constants::DEFAULT_BUILD_TYPE.to_string()]
}

fn default_use_git_root() -> bool {
    true
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ':'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Reject values no run could work with
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(build_dir) = self.build.build_dir.as_deref() {
            if build_dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "build.build_dir".to_string(),
                    value: build_dir.to_string(),
                }
                .into());
            }
        }
        if self.build.conan_build_types.is_empty() {
            return Err(ConfigError::Invalid {
                message: "build.conan_build_types must name at least one build type"
                    .to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // MAK_BUILD_DIR
        if let Ok(build_dir) = std::env::var(constants::ENV_BUILD_DIR) {
            if build_dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: constants::ENV_BUILD_DIR.to_string(),
                    value: build_dir,
                }
                .into());
            }
            self.build.build_dir = Some(build_dir);
        }

        // MAK_COLOR
        if let Ok(color) = std::env::var(constants::ENV_COLOR) {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: constants::ENV_COLOR.to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // MAK_IMPORT_ENV adds to the import list
        if let Ok(names) = std::env::var(constants::ENV_IMPORT_ENV) {
            for name in split_list(&names) {
                if !self.build.import_env.contains(&name) {
                    self.build.import_env.push(name);
                }
            }
        }

        // MAK_CONAN_PROFILE
        if let Ok(profile) = std::env::var(constants::ENV_CONAN_PROFILE) {
            self.build.conan_profile = Some(profile);
        }

        Ok(())
    }

    /// The environment every run starts from.
    ///
    /// Imports the configured variables and the shell's `BUILD_DIR`, then
    /// records the settings the adapters read (`BUILD_DIR`, `CURRENT_PROFILE`,
    /// `CONAN_BUILD_TYPES`). The recorded settings are appended after the
    /// imports, so an explicit build directory shadows the shell's.
    #[must_use]
    pub fn environment(&self) -> Environment {
        let mut env = Environment::new();
        env.import_all(&self.build.import_env);
        env.import(constants::BUILD_DIR_VAR);

        if let Some(build_dir) = &self.build.build_dir {
            env.set(constants::BUILD_DIR_VAR, build_dir);
        }
        if let Some(profile) = &self.build.conan_profile {
            env.set("CURRENT_PROFILE", profile);
        }
        env.set("CONAN_BUILD_TYPES", self.build.conan_build_types.join(","));
        env
    }
}
