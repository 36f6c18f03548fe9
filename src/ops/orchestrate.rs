//! Configure, build, and run.
//!
//! The orchestrator owns one resolved project location and one composed
//! environment and replays them across up to three external invocations.
//! Every step blocks until its child exits. A non-zero exit stops the action
//! and becomes the orchestrator's own exit code; there are no retries.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::builder::cmake::CMake;
use crate::builder::env::{compose_environment, EnvOptions, Environment};
use crate::core::executable::resolve_executable;
use crate::core::platform::{BuildConfig, Platform};
use crate::core::project::ProjectLocation;
use crate::util::process::{find_cmake, Executor, ProcessBuilder, EXIT_SPAWN_FAILED};
use crate::util::shell::{Shell, Status};

/// Exit code when a required tool is missing from `PATH`.
pub const EXIT_TOOL_MISSING: i32 = 127;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Configure,
    Build,
    Run,
    All,
}

/// A CMake invocation whose failure aborts the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Configure,
    Build,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Configure => write!(f, "cmake configure"),
            Step::Build => write!(f, "cmake build"),
        }
    }
}

/// Fatal orchestration failures. Each maps to a process exit code.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestrateError {
    #[error("{tool} not found in PATH")]
    #[diagnostic(
        code(cmrun::tool_missing),
        help("Install {tool} and ensure it's in your PATH")
    )]
    ToolMissing { tool: String },

    #[error("{step} failed with exit code {code}")]
    #[diagnostic(
        code(cmrun::step_failed),
        help("rerun with `--verbose` for the full command lines")
    )]
    StepFailed { step: Step, code: i32 },

    #[error("failed to start `{}`", program.display())]
    #[diagnostic(code(cmrun::spawn_failed))]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create build directory: {}", path.display())]
    #[diagnostic(code(cmrun::build_dir))]
    CreateBuildDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrchestrateError {
    /// The exit code the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestrateError::ToolMissing { .. } => EXIT_TOOL_MISSING,
            OrchestrateError::StepFailed { code, .. } => *code,
            OrchestrateError::SpawnFailed { .. } => EXIT_SPAWN_FAILED,
            OrchestrateError::CreateBuildDir { .. } => 1,
        }
    }
}

/// Locate `cmake`, failing before any action when it is absent.
pub fn locate_cmake() -> Result<PathBuf, OrchestrateError> {
    find_cmake().ok_or_else(|| OrchestrateError::ToolMissing {
        tool: "cmake".to_string(),
    })
}

/// Everything the orchestrator needs, already merged from CLI and config.
#[derive(Debug, Clone)]
pub struct OrchestrateOptions {
    /// Where discovery starts
    pub cwd: PathBuf,
    /// Explicit project root, skipping discovery
    pub source_dir: Option<PathBuf>,
    /// Build directory, relative to the root unless absolute
    pub build_dir: PathBuf,
    pub config: BuildConfig,
    /// Executable name; defaults to the root directory's name
    pub target: Option<String>,
    pub parallel: Option<usize>,
    /// Arguments forwarded to the executable
    pub run_args: Vec<OsString>,
    pub force_utf8: bool,
    pub force_color: bool,
    pub toolchain_root: Option<PathBuf>,
    pub platform: Platform,
}

/// Drives CMake and the built program.
pub struct Orchestrator<'a, E: Executor> {
    shell: &'a Shell,
    executor: E,
    cmake: CMake,
    location: ProjectLocation,
    env: Environment,
    config: BuildConfig,
    target: String,
    parallel: Option<usize>,
    run_args: Vec<OsString>,
    platform: Platform,
}

impl<'a, E: Executor> Orchestrator<'a, E> {
    /// Resolve the project and compose the environment.
    ///
    /// Resolution problems are printed as warnings; none of them are fatal.
    pub fn new(
        opts: OrchestrateOptions,
        base_env: &Environment,
        cmake: CMake,
        executor: E,
        shell: &'a Shell,
    ) -> Self {
        let located =
            ProjectLocation::locate(&opts.cwd, opts.source_dir.as_deref(), &opts.build_dir);
        shell.diagnostics(&located.diagnostics);
        let location = located.value;

        let env_options = EnvOptions {
            force_utf8: opts.force_utf8,
            force_color: opts.force_color,
            toolchain_root: opts.toolchain_root,
            platform: opts.platform,
        };
        let composed = compose_environment(base_env, &env_options);
        shell.diagnostics(&composed.diagnostics);

        let target = opts
            .target
            .or_else(|| location.root_name())
            .unwrap_or_else(|| "main".to_string());

        Orchestrator {
            shell,
            executor,
            cmake,
            location,
            env: composed.value,
            config: opts.config,
            target,
            parallel: opts.parallel,
            run_args: opts.run_args,
            platform: opts.platform,
        }
    }

    pub fn location(&self) -> &ProjectLocation {
        &self.location
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Print where things are.
    pub fn print_summary(&self) {
        self.shell
            .note(format!("source-dir = {}", self.location.root.display()));
        self.shell
            .note(format!("build-dir  = {}", self.location.build_dir.display()));
        if let Some(generator) = self.cmake.get_generator() {
            self.shell.note(format!("generator  = {}", generator));
        }
        if self.shell.is_verbose() {
            self.shell.note(format!("config     = {}", self.config));
            self.shell.note(format!("target     = {}", self.target));
        }
    }

    /// Execute `action`, returning the exit code to terminate with.
    pub fn execute(&mut self, action: Action) -> Result<i32, OrchestrateError> {
        tracing::debug!(?action, config = %self.config, target = %self.target, "executing");

        match action {
            Action::Configure => {
                self.configure()?;
                Ok(0)
            }
            Action::Build => {
                if !self.location.is_configured() {
                    self.shell.note("build dir not configured yet, running configure first");
                    self.configure()?;
                }
                self.build()?;
                Ok(0)
            }
            Action::Run => self.run(),
            Action::All => {
                self.configure()?;
                self.build()?;
                self.run()
            }
        }
    }

    fn configure(&mut self) -> Result<(), OrchestrateError> {
        let build_dir = &self.location.build_dir;
        std::fs::create_dir_all(build_dir).map_err(|source| {
            OrchestrateError::CreateBuildDir {
                path: build_dir.clone(),
                source,
            }
        })?;

        let cmd = self
            .cmake
            .configure_command(&self.location, self.config, &self.env);
        self.shell.status(Status::Configuring, cmd.display_command());
        self.invoke(Step::Configure, &cmd)
    }

    fn build(&mut self) -> Result<(), OrchestrateError> {
        let cmd = self.cmake.build_command(
            &self.location.build_dir,
            self.config,
            self.parallel,
            &self.env,
        );
        let shell = self.shell;
        shell.status(Status::Building, cmd.display_command());

        let span = shell.span(format!("`{}` ({})", self.target, self.config));
        self.invoke(Step::Build, &cmd)?;
        span.finish();
        Ok(())
    }

    fn invoke(&mut self, step: Step, cmd: &ProcessBuilder) -> Result<(), OrchestrateError> {
        match self.executor.run(cmd) {
            Ok(0) => Ok(()),
            Ok(code) => Err(OrchestrateError::StepFailed { step, code }),
            Err(source) => Err(OrchestrateError::SpawnFailed {
                program: cmd.get_program().to_path_buf(),
                source,
            }),
        }
    }

    /// Launch the executable even when it was not found, so a missing
    /// binary fails through the same spawn path as any other launch error.
    fn run(&mut self) -> Result<i32, OrchestrateError> {
        let resolved = resolve_executable(
            &self.location.build_dir,
            &self.target,
            self.config,
            self.platform,
        );
        self.shell.diagnostics(&resolved.diagnostics);

        let cmd = ProcessBuilder::new(&resolved.value)
            .args(&self.run_args)
            .envs(&self.env);
        self.shell.status(Status::Running, cmd.display_command());

        match self.executor.run(&cmd) {
            Ok(code) => {
                tracing::debug!(code, "target exited");
                Ok(code)
            }
            Err(source) => Err(OrchestrateError::SpawnFailed {
                program: resolved.value,
                source,
            }),
        }
    }
}
