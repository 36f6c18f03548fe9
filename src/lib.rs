//! cmrun - configure, build, and run a CMake project in one step
//!
//! This crate provides the library side of the `cmrun` binary: project
//! discovery, executable resolution, child environment composition, and the
//! orchestrator that drives CMake and the built program.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for cmrun unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock process executor.
#[cfg(test)]
pub mod test_support;

pub use core::{
    executable::resolve_executable,
    platform::{BuildConfig, Platform},
    project::ProjectLocation,
};

pub use ops::orchestrate::{Action, OrchestrateError, OrchestrateOptions, Orchestrator};
pub use util::config::Config;
