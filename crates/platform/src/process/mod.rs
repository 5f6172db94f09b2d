//! Process execution operations

use async_trait::async_trait;
use mak_types::{Environment, ExecutionResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Command line, environment and working directory of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl PlatformCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Replace the child's environment with the effective bindings of `env`.
    pub fn environment(&mut self, env: &Environment) -> &mut Self {
        self.env = env
            .vars()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn get_env_vars(&self) -> &[(String, String)] {
        &self.env
    }
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs commands for builders.
///
/// Implementations never fail: spawn errors and signals are reported through
/// the returned [`ExecutionResult`].
#[async_trait]
pub trait ProcessOperations: Send + Sync {
    async fn execute_command(&self, cmd: PlatformCommand) -> ExecutionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let mut env = Environment::new();
        env.set("BUILD_DIR", "out").set("BUILD_DIR", "build");

        let mut cmd = PlatformCommand::new("cmake");
        cmd.arg("-S")
            .arg(".")
            .args(["-B", "build"])
            .current_dir("/src")
            .environment(&env);

        assert_eq!(cmd.program(), "cmake");
        assert_eq!(cmd.get_args(), ["-S", ".", "-B", "build"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/src")));
        assert_eq!(
            cmd.get_env_vars(),
            [("BUILD_DIR".to_string(), "build".to_string())]
        );
        assert_eq!(cmd.to_string(), "cmake -S . -B build");
    }
}
