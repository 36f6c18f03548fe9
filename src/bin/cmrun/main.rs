//! cmrun CLI - configure, build, and run a CMake project

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic as _;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use cmrun::ops::OrchestrateError;
use cmrun::util::diagnostic::{self, Diagnostic};
use cmrun::util::Shell;

fn main() {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cmrun=debug")
    } else {
        EnvFilter::new("cmrun=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    let code = match run(cli.command, &shell) {
        Ok(code) => code,
        Err(e) => report(&e, &shell),
    };

    std::process::exit(code);
}

fn run(command: Commands, shell: &Shell) -> Result<i32> {
    match command {
        Commands::Configure(args) => commands::configure::execute(args, shell),
        Commands::Build(args) => commands::build::execute(args, shell),
        Commands::Run(args) => commands::run::execute(args, shell),
        Commands::All(args) => commands::all::execute(args, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print a fatal error and pick the exit code for it.
fn report(e: &anyhow::Error, shell: &Shell) -> i32 {
    let mut diag = Diagnostic::error(format!("{:#}", e));

    let code = match e.downcast_ref::<OrchestrateError>() {
        Some(err) => {
            if let Some(help) = err.help() {
                diag = diag.with_suggestion(help.to_string());
            }
            err.exit_code()
        }
        None => 1,
    };

    diagnostic::emit(&diag, shell.use_color());
    code
}
