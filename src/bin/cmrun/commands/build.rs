//! `cmrun build` command
//!
//! Configures first when the build directory has no CMake cache yet.

use anyhow::Result;

use crate::cli::ProjectArgs;
use cmrun::ops::Action;
use cmrun::util::Shell;

pub fn execute(args: ProjectArgs, shell: &Shell) -> Result<i32> {
    super::execute(Action::Build, args, Vec::new(), shell)
}
