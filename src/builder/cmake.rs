//! CMake command lines for the configure and build steps.

use std::path::{Path, PathBuf};

use crate::builder::env::Environment;
use crate::core::platform::BuildConfig;
use crate::core::project::ProjectLocation;
use crate::util::process::{find_ninja, ProcessBuilder};

/// CMake invocation settings shared by configure and build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMake {
    program: PathBuf,
    generator: Option<String>,
    cmake_args: Vec<String>,
}

impl CMake {
    /// Create an adapter around the given `cmake` binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CMake {
            program: program.into(),
            generator: None,
            cmake_args: Vec::new(),
        }
    }

    /// Set the generator (`-G`).
    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    /// Add extra configure arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cmake_args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    pub fn get_generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    /// `cmake -S <root> -B <build> [-G <gen>] -DCMAKE_BUILD_TYPE=<config> [args...]`
    pub fn configure_command(
        &self,
        location: &ProjectLocation,
        config: BuildConfig,
        env: &Environment,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg("-S")
            .arg(&location.root)
            .arg("-B")
            .arg(&location.build_dir);

        if let Some(ref generator) = self.generator {
            cmd = cmd.arg("-G").arg(generator);
        }

        cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", config));

        cmd.args(&self.cmake_args).envs(env)
    }

    /// `cmake --build <build> --config <config> [--parallel N]`
    ///
    /// `--config` selects the configuration for multi-config generators and
    /// is ignored by single-config ones. `--parallel` is translated by CMake
    /// for whichever native tool the generator drives.
    pub fn build_command(
        &self,
        build_dir: &Path,
        config: BuildConfig,
        parallel: Option<usize>,
        env: &Environment,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg("--build")
            .arg(build_dir)
            .arg("--config")
            .arg(config.as_str());

        if let Some(jobs) = parallel.filter(|&n| n > 0) {
            cmd = cmd.arg("--parallel").arg(jobs.to_string());
        }

        cmd.envs(env)
    }
}

/// Ninja when it is installed, otherwise CMake's own default.
pub fn detect_default_generator() -> Option<String> {
    find_ninja().map(|_| "Ninja".to_string())
}
