//! Subprocess execution utilities.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::builder::env::Environment;

/// Exit code reported when a program cannot be started at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    env: Option<Environment>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Replace the inherited environment with `env`.
    pub fn envs(mut self, env: &Environment) -> Self {
        self.env = Some(env.clone());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Get the environment, if one was set.
    pub fn get_env(&self) -> Option<&Environment> {
        self.env.as_ref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref env) = self.env {
            cmd.env_clear();
            cmd.envs(env);
        }

        cmd
    }

    /// Execute the command, capturing its output.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))
    }

    /// Execute with inherited stdio and wait for completion.
    ///
    /// The error is the raw spawn failure so callers can tell "could not
    /// start" apart from "ran and failed".
    pub fn status(&self) -> io::Result<ExitStatus> {
        self.build_command().status()
    }

    /// Display the command for status lines and error messages.
    ///
    /// Lossy; the arguments passed to the child are untouched.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Runs processes on behalf of the orchestrator.
pub trait Executor {
    /// Run `cmd` to completion with inherited stdio and return its exit code.
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<i32>;
}

/// Executor that spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> io::Result<i32> {
        cmd.status().map(exit_code)
    }
}

/// Map an exit status to a shell-style exit code.
///
/// On Unix a signal-terminated child maps to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}

/// Find Ninja.
pub fn find_ninja() -> Option<PathBuf> {
    find_executable("ninja")
}

/// Get the CMake version string, e.g. `3.28.1`.
pub fn cmake_version(cmake: &Path) -> Option<String> {
    let output = ProcessBuilder::new(cmake).arg("--version").exec().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("cmake version "))
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_process_builder() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.trim() == "hello" || stdout.contains("hello"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", "build", "--config", "Debug"]);

        assert_eq!(pb.display_command(), "cmake --build build --config Debug");
    }

    #[test]
    #[cfg(unix)]
    fn test_env_replaces_inherited() {
        let mut env = Environment::new();
        env.insert(OsString::from("CMRUN_ANSWER"), OsString::from("42"));

        let output = ProcessBuilder::new("/bin/sh")
            .args(["-c", "echo \"$CMRUN_ANSWER:${HOME:-unset}\""])
            .envs(&env)
            .exec()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "42:unset");
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_env_reaches_child() {
        use std::os::unix::ffi::OsStrExt;

        let mut env = Environment::new();
        env.insert(
            OsString::from("CMRUN_LATIN1"),
            OsStr::from_bytes(b"caf\xe9").to_os_string(),
        );

        let output = ProcessBuilder::new("/bin/sh")
            .args(["-c", "printf '%s' \"$CMRUN_LATIN1\""])
            .envs(&env)
            .exec()
            .unwrap();

        assert_eq!(output.stdout, b"caf\xe9");
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_args_reach_child() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9");
        let pb = ProcessBuilder::new("/bin/sh")
            .args(["-c", "printf '%s' \"$1\"", "sh"])
            .arg(raw);

        assert_eq!(pb.get_args().last().map(OsString::as_os_str), Some(raw));
        assert_eq!(pb.display_command(), "/bin/sh -c printf '%s' \"$1\" sh caf\u{fffd}");

        let output = pb.exec().unwrap();
        assert_eq!(output.stdout, b"caf\xe9");
    }

    #[test]
    #[cfg(unix)]
    fn test_system_executor_exit_codes() {
        let mut exec = SystemExecutor;

        let ok = ProcessBuilder::new("/bin/sh").args(["-c", "exit 0"]);
        assert_eq!(exec.run(&ok).unwrap(), 0);

        let failed = ProcessBuilder::new("/bin/sh").args(["-c", "exit 3"]);
        assert_eq!(exec.run(&failed).unwrap(), 3);

        let killed = ProcessBuilder::new("/bin/sh").args(["-c", "kill -9 $$"]);
        assert_eq!(exec.run(&killed).unwrap(), 128 + 9);
    }

    #[test]
    fn test_system_executor_spawn_failure() {
        let mut exec = SystemExecutor;
        let missing = ProcessBuilder::new("/definitely/not/a/real/program");

        let err = exec.run(&missing).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
