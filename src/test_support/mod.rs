//! Test utilities and mocks for cmrun unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmrun::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut exec = MockExecutor::new();
//!     exec.expect_prefix("cmake --build", MockProcessOutput::failure(2));
//!
//!     // Hand `exec` to an Orchestrator...
//! }
//! ```

use std::io;

use crate::builder::env::Environment;
use crate::util::process::{Executor, ProcessBuilder};

/// Mock outcome of a command. Children inherit stdio, so only the exit
/// status is observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
}

impl MockProcessOutput {
    /// Create a successful output.
    pub fn success() -> Self {
        MockProcessOutput { status: 0 }
    }

    /// Create a failed output.
    pub fn failure(status: i32) -> Self {
        MockProcessOutput { status }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation { pattern, output }
    }
}

/// Mock process executor for testing command execution.
///
/// Records every command line and the environment it was given. Commands
/// that match no expectation fail to spawn with `NotFound`, like a missing
/// program would.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    envs: Vec<Option<Environment>>,
    default_output: Option<MockProcessOutput>,
    spawn_failure: bool,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Make every command fail to spawn.
    pub fn set_spawn_failure(&mut self, fail: bool) -> &mut Self {
        self.spawn_failure = fail;
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Get the environment each call was given, in call order.
    pub fn envs(&self) -> &[Option<Environment>] {
        &self.envs
    }
}

impl Executor for MockExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<i32> {
        let full_cmd = cmd.display_command();
        self.calls.push(full_cmd.clone());
        self.envs.push(cmd.get_env().cloned());

        if self.spawn_failure {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such program: {}", cmd.get_program().display()),
            ));
        }

        if let Some(exp) = self
            .expectations
            .iter()
            .find(|exp| exp.pattern.matches(&full_cmd))
        {
            return Ok(exp.output.status);
        }

        if let Some(default) = self.default_output {
            return Ok(default.status);
        }

        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unexpected command: {}", full_cmd),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_expectations() {
        let mut exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success())
            .expect_pattern(CommandExpectation::new(
                CommandPattern::StartsWith("cmake --build".to_string()),
                MockProcessOutput::failure(2),
            ));

        let version = ProcessBuilder::new("cmake").arg("--version");
        assert_eq!(exec.run(&version).unwrap(), 0);

        let build = ProcessBuilder::new("cmake").args(["--build", "build"]);
        assert_eq!(exec.run(&build).unwrap(), 2);

        // No expectation and no default
        let other = ProcessBuilder::new("ninja");
        assert!(exec.run(&other).is_err());

        assert_eq!(
            exec.calls(),
            ["cmake --version", "cmake --build build", "ninja"]
        );
    }

    #[test]
    fn test_mock_executor_records_env() {
        let mut env = Environment::new();
        env.insert("CLICOLOR_FORCE".into(), "1".into());

        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success());
        exec.run(&ProcessBuilder::new("demo").envs(&env)).unwrap();
        exec.run(&ProcessBuilder::new("demo")).unwrap();

        assert_eq!(exec.envs(), [Some(env), None]);
    }

    #[test]
    fn test_pattern_any() {
        assert!(CommandPattern::Any.matches("anything at all"));
        assert!(!CommandPattern::Exact("a".to_string()).matches("ab"));
    }
}
