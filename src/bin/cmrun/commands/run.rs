//! `cmrun run` command
//!
//! Runs whatever the last build produced; nothing is rebuilt.

use anyhow::Result;

use crate::cli::RunArgs;
use cmrun::ops::Action;
use cmrun::util::Shell;

pub fn execute(args: RunArgs, shell: &Shell) -> Result<i32> {
    super::execute(Action::Run, args.project, args.args, shell)
}
