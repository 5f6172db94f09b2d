//! CMake preset discovery
//!
//! Collects preset names per category from `CMakePresets.json`-style files,
//! following `include` lists. Each file contributes at most once, so include
//! cycles and diamonds terminate. Included files are resolved relative to the
//! including file and contribute their names before the including file's own.

use mak_errors::{ConfigError, Error};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Deepest include chain accepted
pub const MAX_INCLUDE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCategory {
    Configure,
    Build,
    Test,
    Package,
}

impl PresetCategory {
    pub const ALL: [PresetCategory; 4] = [Self::Configure, Self::Build, Self::Test, Self::Package];

    /// Key of the preset array in the JSON document
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Configure => "configurePresets",
            Self::Build => "buildPresets",
            Self::Test => "testPresets",
            Self::Package => "packagePresets",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
            Self::Package => "package",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, deduplicated preset names per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetCatalog {
    presets: [Vec<String>; 4],
}

impl PresetCatalog {
    /// Load every entry file in order.
    ///
    /// Entry files that do not exist contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed documents and
    /// [`ConfigError::IncludeDepthExceeded`] for runaway include chains.
    pub fn load<P: AsRef<Path>>(entry_files: &[P]) -> Result<Self, Error> {
        let mut visited = HashSet::new();
        entry_files.iter().try_fold(Self::default(), |catalog, file| {
            Ok(catalog.merge(load_file(file.as_ref(), &mut visited, 0)?))
        })
    }

    pub fn presets(&self, category: PresetCategory) -> &[String] {
        &self.presets[category.index()]
    }

    #[must_use]
    pub fn contains(&self, category: PresetCategory, name: &str) -> bool {
        self.presets(category).iter().any(|preset| preset == name)
    }

    #[must_use]
    pub fn first(&self, category: PresetCategory) -> Option<&str> {
        self.presets(category).first().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.iter().all(Vec::is_empty)
    }

    /// Append `other`'s names after this catalog's, skipping known names
    #[must_use]
    pub fn merge(mut self, other: PresetCatalog) -> Self {
        for (mine, theirs) in self.presets.iter_mut().zip(other.presets) {
            for name in theirs {
                if !mine.contains(&name) {
                    mine.push(name);
                }
            }
        }
        self
    }

    fn with_document(mut self, document: &Value, path: &Path) -> Result<Self, Error> {
        for category in PresetCategory::ALL {
            let Some(entries) = document.get(category.key()) else {
                continue;
            };
            let entries = entries.as_array().ok_or_else(|| {
                parse_error(path, &format!("`{}` is not an array", category.key()))
            })?;

            let names = &mut self.presets[category.index()];
            for entry in entries {
                let name = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        parse_error(path, &format!("preset in `{}` without a name", category.key()))
                    })?;
                if !names.iter().any(|known| known == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(self)
    }
}

fn parse_error(path: &Path, message: &str) -> Error {
    ConfigError::ParseError {
        message: format!("{}: {message}", path.display()),
    }
    .into()
}

/// Load one file and, first, everything it includes.
///
/// `visited` holds the canonical paths already loaded.
///
/// # Errors
///
/// Returns an error for malformed JSON, a preset without a string `name`, or
/// an include chain deeper than [`MAX_INCLUDE_DEPTH`].
pub fn load_file(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<PresetCatalog, Error> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(ConfigError::IncludeDepthExceeded {
            path: path.display().to_string(),
        }
        .into());
    }

    let Ok(canonical) = path.canonicalize() else {
        tracing::debug!(path = %path.display(), "preset file not found");
        return Ok(PresetCatalog::default());
    };
    if !canonical.is_file() || !visited.insert(canonical.clone()) {
        return Ok(PresetCatalog::default());
    }

    let contents = match std::fs::read_to_string(&canonical) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "preset file unreadable");
            return Ok(PresetCatalog::default());
        }
    };
    let document: Value = serde_json::from_str(&contents).map_err(|e| parse_error(path, &e.to_string()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let mut catalog = PresetCatalog::default();
    if let Some(includes) = document.get("include").and_then(Value::as_array) {
        for include in includes.iter().filter_map(Value::as_str) {
            let included = load_file(&base.join(include), visited, depth + 1)?;
            catalog = catalog.merge(included);
        }
    }

    tracing::trace!(path = %path.display(), "loaded presets");
    catalog.with_document(&document, path)
}
