//! CLI definitions using clap.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use cmrun::core::BuildConfig;
use cmrun::util::shell::ColorChoice;

/// cmrun - configure, build, and run a CMake project
#[derive(Parser)]
#[command(name = "cmrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run CMake configure
    Configure(ProjectArgs),

    /// Build the project, configuring first if needed
    Build(ProjectArgs),

    /// Run the built executable
    Run(RunArgs),

    /// Configure, build, and run
    All(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every project command.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root containing CMakeLists.txt (default: search upward from the current directory)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Build directory, inside the source dir unless absolute [default: build]
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Build configuration: Debug, Release, RelWithDebInfo, MinSizeRel [default: Debug]
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<BuildConfig>,

    /// CMake generator, e.g. "Ninja" (default: Ninja if available, else CMake's default)
    #[arg(long, short = 'G')]
    pub generator: Option<String>,

    /// Target executable name (default: the project directory's name)
    #[arg(long)]
    pub target: Option<String>,

    /// Parallel build jobs (default: the build tool's default)
    #[arg(long, short = 'j', value_name = "N")]
    pub parallel: Option<usize>,

    /// CUDA toolkit root wired into the child environment
    #[arg(long, value_name = "DIR")]
    pub cuda_root: Option<PathBuf>,

    /// CUDA version used to derive the default toolkit root, e.g. 12.4
    #[arg(long, value_name = "VERSION")]
    pub cuda_version: Option<String>,

    /// Extra argument for CMake configure (repeatable)
    #[arg(long = "cmake-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub cmake_args: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Arguments to pass to the executable
    #[arg(last = true)]
    pub args: Vec<OsString>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
