//! Owning handle over an optional adapter

use mak_errors::Error;
use mak_platform::{ProcessOperations, WorkDir};
use mak_types::{ExecutionResult, Stage};
use std::fmt;

use crate::build_systems::BuildSystem;

/// Name reported by an empty handle
pub const NO_BUILDER: &str = "«NO BUILDER»";

/// A selected adapter, or nothing.
///
/// The empty handle is what selection returns when no adapter matched: it
/// reports [`NO_BUILDER`], stage `Done`, is not required and has no
/// successor.
#[derive(Default)]
pub struct Builder {
    inner: Option<Box<dyn BuildSystem>>,
}

impl Builder {
    pub fn new(inner: Box<dyn BuildSystem>) -> Self {
        Self { inner: Some(inner) }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.inner.is_some()
    }

    pub fn name(&self) -> &str {
        self.inner.as_ref().map_or(NO_BUILDER, |inner| inner.name())
    }

    pub fn stage(&self) -> Stage {
        self.inner.as_ref().map_or(Stage::Done, |inner| inner.stage())
    }

    pub fn required(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.required())
    }

    pub fn root(&self) -> Option<&WorkDir> {
        self.inner.as_ref().map(|inner| inner.root())
    }

    /// The adapter's successor; empty for an empty handle
    ///
    /// # Errors
    ///
    /// Returns an error if the successor cannot be constructed.
    pub fn next_builder(&self) -> Result<Builder, Error> {
        match &self.inner {
            Some(inner) => Ok(Self {
                inner: inner.next_builder()?,
            }),
            None => Ok(Self::default()),
        }
    }

    /// Run the adapter; an empty handle reports `NotDone`
    pub async fn run(
        &self,
        process: &dyn ProcessOperations,
        target: &str,
        stage_args: &[String],
    ) -> ExecutionResult {
        match &self.inner {
            Some(inner) => inner.run(process, target, stage_args).await,
            None => ExecutionResult::default(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the adapter's cleanup hook fails.
    pub fn cleanup(&self) -> Result<(), Error> {
        self.inner.as_ref().map_or(Ok(()), |inner| inner.cleanup())
    }

    /// Human readable command line for `target`
    pub fn describe(&self, target: &str, stage_args: &[String]) -> String {
        self.inner.as_ref().map_or_else(String::new, |inner| {
            inner.command_line(target, stage_args).to_string()
        })
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🔧 {}", self.name())
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("name", &self.name())
            .field("stage", &self.stage())
            .field("root", &self.root())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_systems::{make, BasicBuildSystem};
    use mak_types::{Environment, ExecutionStatus};

    struct NeverCalled;

    #[async_trait::async_trait]
    impl ProcessOperations for NeverCalled {
        async fn execute_command(&self, _cmd: mak_platform::PlatformCommand) -> ExecutionResult {
            panic!("empty builder must not spawn")
        }
    }

    #[tokio::test]
    async fn test_empty_builder() {
        let builder = Builder::default();
        assert!(!builder.is_found());
        assert_eq!(builder.name(), NO_BUILDER);
        assert_eq!(builder.stage(), Stage::Done);
        assert!(!builder.required());
        assert!(builder.root().is_none());
        assert!(!builder.next_builder().unwrap().is_found());
        assert!(builder.cleanup().is_ok());
        assert_eq!(builder.to_string(), "🔧 «NO BUILDER»");

        let result = builder.run(&NeverCalled, "", &[]).await;
        assert_eq!(result.status, ExecutionStatus::NotDone);
        assert!(!result.is_ok());
    }

    #[test]
    fn test_found_builder() {
        let system = BasicBuildSystem::new(
            &make::SPEC,
            WorkDir::new("/src"),
            Stage::Build,
            Some(Environment::new()),
        );
        let builder = Builder::new(Box::new(system));
        assert!(builder.is_found());
        assert!(builder.required());
        assert_eq!(builder.stage(), Stage::Build);
        assert_eq!(builder.to_string(), "🔧 make");
        assert_eq!(builder.describe("all", &[]), "make all");
    }
}
