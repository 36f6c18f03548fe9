//! Command implementations

pub mod all;
pub mod build;
pub mod completions;
pub mod configure;
pub mod run;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;
use cmrun::builder::cmake::detect_default_generator;
use cmrun::builder::{default_cuda_root, env, CMake};
use cmrun::core::platform::Platform;
use cmrun::core::project::{find_project_root, DEFAULT_BUILD_DIR};
use cmrun::ops::{locate_cmake, Action, OrchestrateOptions, Orchestrator};
use cmrun::util::config::{global_config_path, load_config, project_config_path};
use cmrun::util::fs::normalize_path;
use cmrun::util::process::{cmake_version, SystemExecutor};
use cmrun::util::{Config, Shell};

/// CLI flags merged over the config files.
#[derive(Debug)]
struct Settings {
    options: OrchestrateOptions,
    generator: Option<String>,
    cmake_args: Vec<String>,
}

/// Run `action` against the project the flags point at.
///
/// `cmake` is checked before anything else; its absence is fatal.
fn execute(
    action: Action,
    args: ProjectArgs,
    run_args: Vec<OsString>,
    shell: &Shell,
) -> Result<i32> {
    let cmake_program = locate_cmake()?;
    tracing::debug!(
        "using {} ({})",
        cmake_program.display(),
        cmake_version(&cmake_program).unwrap_or_else(|| "unknown version".to_string())
    );

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let config = load_project_config(&cwd, args.source_dir.as_deref());

    let platform = Platform::host();
    let settings = merge_settings(args, run_args, config, cwd, platform);

    let generator = settings.generator.or_else(detect_default_generator);
    let cmake = CMake::new(cmake_program)
        .generator(generator)
        .args(settings.cmake_args);

    let mut orchestrator = Orchestrator::new(
        settings.options,
        &env::ambient(),
        cmake,
        SystemExecutor,
        shell,
    );
    orchestrator.print_summary();

    Ok(orchestrator.execute(action)?)
}

/// Load the global and project config files.
///
/// The root is looked up here only to find the project config; the
/// orchestrator repeats the lookup and reports its diagnostics.
fn load_project_config(cwd: &Path, source_dir: Option<&Path>) -> Config {
    let root = match source_dir {
        Some(dir) => normalize_path(&cwd.join(dir)),
        None => find_project_root(cwd).value,
    };

    load_config(global_config_path().as_deref(), &project_config_path(&root))
}

fn merge_settings(
    args: ProjectArgs,
    run_args: Vec<OsString>,
    config: Config,
    cwd: PathBuf,
    platform: Platform,
) -> Settings {
    let force_utf8 = config.force_utf8();
    let force_color = config.force_color();
    let build = config.build;
    let toolchain = config.toolchain;

    // Explicit roots beat versions, and CLI beats config
    let toolchain_root = args
        .cuda_root
        .or_else(|| args.cuda_version.as_deref().map(default_cuda_root))
        .or(toolchain.cuda_root)
        .or_else(|| toolchain.cuda_version.as_deref().map(default_cuda_root));

    // Config arguments first so a repeated -D on the command line wins
    let mut cmake_args = build.cmake_args;
    cmake_args.extend(args.cmake_args);

    let options = OrchestrateOptions {
        cwd,
        source_dir: args.source_dir,
        build_dir: args
            .build_dir
            .or(build.build_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR)),
        config: args.config.or(build.config).unwrap_or_default(),
        target: args.target.or(build.target),
        parallel: args.parallel.or(build.parallel),
        run_args,
        force_utf8,
        force_color,
        toolchain_root,
        platform,
    };

    Settings {
        options,
        generator: args.generator.or(build.generator),
        cmake_args,
    }
}
