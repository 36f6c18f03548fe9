//! `cmrun configure` command

use anyhow::Result;

use crate::cli::ProjectArgs;
use cmrun::ops::Action;
use cmrun::util::Shell;

pub fn execute(args: ProjectArgs, shell: &Shell) -> Result<i32> {
    super::execute(Action::Configure, args, Vec::new(), shell)
}
