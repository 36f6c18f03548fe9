//! High-level operations.
//!
//! This module contains the implementation of cmrun commands.

pub mod orchestrate;

pub use orchestrate::{
    locate_cmake, Action, OrchestrateError, OrchestrateOptions, Orchestrator, EXIT_TOOL_MISSING,
};
