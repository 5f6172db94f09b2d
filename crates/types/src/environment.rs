//! Append-only environment store handed from one builder to the next
//!
//! Bindings are never rewritten in place: `set` appends, and lookups resolve
//! to the most recent binding of a name. Cloning copies the whole log, which
//! is how a successor builder receives a snapshot instead of a live reference.

use mak_errors::EnvError;
use std::fmt::Display;
use std::str::FromStr;

/// Ordered `name=value` bindings with last-write-wins lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: Vec<(String, String)>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `name` from the process environment, if it is set.
    pub fn import(&mut self, name: &str) -> &mut Self {
        if let Ok(value) = std::env::var(name) {
            self.bindings.push((name.to_string(), value));
        }
        self
    }

    /// Import every name in `names`.
    pub fn import_all<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.import(name.as_ref());
        }
        self
    }

    /// Append `name=value`.
    pub fn set(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.bindings.push((name.to_string(), value.to_string()));
        self
    }

    /// Raw text of the most recent binding of `name`
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parse the most recent binding of `name` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Missing`] when no binding exists and
    /// [`EnvError::Parse`] when the text does not convert to `T`.
    pub fn get<T>(&self, name: &str) -> Result<T, EnvError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.value(name).ok_or_else(|| EnvError::Missing {
            name: name.to_string(),
        })?;

        value.parse().map_err(|e: T::Err| EnvError::Parse {
            name: name.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|(key, _)| key == name)
    }

    /// Number of append events, shadowed bindings included
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Effective bindings: one entry per name, in first-appearance order,
    /// carrying the most recent value.
    #[must_use]
    pub fn vars(&self) -> Vec<(&str, &str)> {
        let mut vars: Vec<(&str, &str)> = Vec::new();
        for (name, value) in &self.bindings {
            match vars.iter_mut().find(|(key, _)| *key == name.as_str()) {
                Some(slot) => slot.1 = value.as_str(),
                None => vars.push((name.as_str(), value.as_str())),
            }
        }
        vars
    }
}
