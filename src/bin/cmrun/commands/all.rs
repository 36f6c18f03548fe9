//! `cmrun all` command

use anyhow::Result;

use crate::cli::RunArgs;
use cmrun::ops::Action;
use cmrun::util::Shell;

pub fn execute(args: RunArgs, shell: &Shell) -> Result<i32> {
    super::execute(Action::All, args.project, args.args, shell)
}
