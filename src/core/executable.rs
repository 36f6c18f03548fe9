//! Locating the executable a CMake build produced.
//!
//! Generators disagree on where binaries land: single-config generators
//! (Ninja, Makefiles) write them flat into the build tree or a `bin/`
//! folder, multi-config generators (Visual Studio, Xcode) nest them in a
//! per-configuration subfolder. Resolution tries the plausible locations in
//! a fixed priority order.

use std::path::{Path, PathBuf};

use crate::core::platform::{BuildConfig, Platform};
use crate::util::diagnostic::{Resolved, Warning};

/// Configurations always searched last, whatever was requested.
const FALLBACK_CONFIGS: &[BuildConfig] = &[BuildConfig::Release, BuildConfig::Debug];

/// Compute every plausible location of `target`, highest priority first.
///
/// Never touches the filesystem. Duplicates (e.g. `Release/` when the
/// requested config is `Release`) keep only their first position.
pub fn list_executable_candidates(
    build_dir: &Path,
    target: &str,
    config: BuildConfig,
    platform: Platform,
) -> Vec<PathBuf> {
    let exe_name = platform.exe_name(target);

    let mut candidates = vec![
        build_dir.join(&exe_name),
        build_dir.join("bin").join(&exe_name),
        build_dir.join(config.as_str()).join(&exe_name),
        build_dir.join("src").join(config.as_str()).join(&exe_name),
        build_dir.join("apps").join(config.as_str()).join(&exe_name),
    ];

    for fallback in FALLBACK_CONFIGS {
        candidates.push(build_dir.join(fallback.as_str()).join(&exe_name));
    }

    let mut unique: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Pick the first candidate that exists.
///
/// When nothing has been built yet the first candidate is returned anyway,
/// tagged with [`Warning::ExecutableNotFound`], so a launch attempt fails
/// through the normal spawn path.
pub fn resolve_executable(
    build_dir: &Path,
    target: &str,
    config: BuildConfig,
    platform: Platform,
) -> Resolved<PathBuf> {
    let candidates = list_executable_candidates(build_dir, target, config, platform);

    if let Some(found) = candidates.iter().find(|c| c.exists()) {
        tracing::debug!("resolved executable: {}", found.display());
        return Resolved::ok(found.clone());
    }

    for candidate in &candidates {
        tracing::trace!("not found: {}", candidate.display());
    }

    let first = candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| build_dir.join(platform.exe_name(target)));

    Resolved::degraded(first.clone(), Warning::ExecutableNotFound { path: first })
}
