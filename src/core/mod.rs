//! Core data structures for cmrun.
//!
//! This module contains the pure path logic:
//! - Host platform and CMake build types
//! - Project root and build directory discovery
//! - Executable candidate lists

pub mod executable;
pub mod platform;
pub mod project;

pub use executable::{list_executable_candidates, resolve_executable};
pub use platform::{BuildConfig, Platform};
pub use project::{find_project_root, is_configured, ProjectLocation};
