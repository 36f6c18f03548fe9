//! Child process environment composition.
//!
//! The environment handed to CMake and to the built program is computed
//! once, up front, in three layers:
//!
//! 1. the inherited environment, copied byte for byte
//! 2. encoding and color hints, only where the user has not set them
//! 3. CUDA toolchain wiring, which does overwrite and extend
//!
//! The result is a plain map that can be reused for every spawn.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::builder::toolchain::CudaToolchain;
use crate::core::platform::Platform;
use crate::util::diagnostic::Resolved;

/// Variable name to value. Names and values are kept as the OS hands them
/// over, so non-UTF-8 entries survive the round trip.
pub type Environment = BTreeMap<OsString, OsString>;

/// Encoding hints, applied only when absent.
const UTF8_DEFAULTS: &[(&str, &str)] = &[("PYTHONIOENCODING", "utf-8"), ("PYTHONUTF8", "1")];

/// Locale default, applied only when absent and only where glibc ships it.
const LOCALE_DEFAULT: (&str, &str) = ("LANG", "C.UTF-8");

/// Color hints, applied only when absent.
const COLOR_DEFAULTS: &[(&str, &str)] = &[
    ("CLICOLOR", "1"),
    ("FORCE_COLOR", "1"),
    ("CMAKE_COLOR_DIAGNOSTICS", "ON"),
];

/// Always set when forcing color; tools drop color when stdout is not a TTY.
const COLOR_FORCE: (&str, &str) = ("CLICOLOR_FORCE", "1");

/// Options for [`compose_environment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOptions {
    pub force_utf8: bool,
    pub force_color: bool,
    pub toolchain_root: Option<PathBuf>,
    pub platform: Platform,
}

impl Default for EnvOptions {
    fn default() -> Self {
        EnvOptions {
            force_utf8: true,
            force_color: true,
            toolchain_root: None,
            platform: Platform::host(),
        }
    }
}

/// Snapshot the current process environment.
pub fn ambient() -> Environment {
    std::env::vars_os().collect()
}

/// Build the environment for child processes.
///
/// `base` is never modified. Problems with the toolchain are reported as
/// diagnostics and leave layer 3 out.
pub fn compose_environment(base: &Environment, options: &EnvOptions) -> Resolved<Environment> {
    let platform = options.platform;
    let mut env = base.clone();

    if options.force_utf8 {
        for (key, value) in UTF8_DEFAULTS {
            set_default(&mut env, key, OsStr::new(value), platform);
        }
        if platform.has_c_utf8_locale() {
            set_default(&mut env, LOCALE_DEFAULT.0, OsStr::new(LOCALE_DEFAULT.1), platform);
        }
    }

    if options.force_color {
        for (key, value) in COLOR_DEFAULTS {
            set_default(&mut env, key, OsStr::new(value), platform);
        }
        set(&mut env, COLOR_FORCE.0, OsStr::new(COLOR_FORCE.1), platform);
    }

    let mut diagnostics = Vec::new();

    match &options.toolchain_root {
        Some(root) if platform.is_windows() => match CudaToolchain::verify(root, platform) {
            Ok(cuda) => apply_toolchain(&mut env, &cuda, platform),
            Err(warning) => {
                tracing::debug!("skipping CUDA wiring: {}", warning);
                diagnostics.push(warning);
            }
        },
        Some(root) => {
            tracing::debug!(
                "ignoring CUDA root {} on a non-Windows platform",
                root.display()
            );
        }
        None => {}
    }

    Resolved {
        value: env,
        diagnostics,
    }
}

fn apply_toolchain(env: &mut Environment, cuda: &CudaToolchain, platform: Platform) {
    set(env, "CUDA_PATH", cuda.root.as_os_str(), platform);
    set(env, "CUDAToolkit_ROOT", cuda.root.as_os_str(), platform);
    set(env, "CUDACXX", cuda.nvcc.as_os_str(), platform);

    let key = find_key(env, "PATH", platform).unwrap_or_else(|| OsString::from("PATH"));
    let mut value = cuda.bin_dir().into_os_string();
    if let Some(existing) = env.get(&key).filter(|v| !v.is_empty()) {
        value.push(platform.path_separator());
        value.push(existing);
    }
    env.insert(key, value);

    tracing::debug!("wired CUDA toolkit at {}", cuda.root.display());
}

/// Find the stored spelling of `name`. Windows variable names are
/// case-insensitive.
fn find_key(env: &Environment, name: &str, platform: Platform) -> Option<OsString> {
    if platform.is_windows() {
        env.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned()
    } else {
        env.contains_key(OsStr::new(name))
            .then(|| OsString::from(name))
    }
}

fn set_default(env: &mut Environment, name: &str, value: &OsStr, platform: Platform) {
    if find_key(env, name, platform).is_none() {
        env.insert(OsString::from(name), value.to_os_string());
    }
}

fn set(env: &mut Environment, name: &str, value: &OsStr, platform: Platform) {
    let key = find_key(env, name, platform).unwrap_or_else(|| OsString::from(name));
    env.insert(key, value.to_os_string());
}
