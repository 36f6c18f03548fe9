//! Project root discovery and build directory resolution.

use std::path::{Path, PathBuf};

use crate::util::diagnostic::{Resolved, Warning};
use crate::util::fs::normalize_path;

/// Marker file identifying the project root.
pub const PROJECT_MARKER: &str = "CMakeLists.txt";

/// Marker file CMake leaves in a configured build directory.
pub const CONFIGURED_MARKER: &str = "CMakeCache.txt";

/// Default build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Where the sources live and where the build goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Directory containing CMakeLists.txt (or the best guess)
    pub root: PathBuf,
    /// Absolute build directory
    pub build_dir: PathBuf,
}

impl ProjectLocation {
    /// Locate the project.
    ///
    /// An explicit `source_dir` wins over discovery and is taken as-is
    /// (relative paths are resolved against `cwd`). Otherwise the root is
    /// discovered by walking upward from `cwd`.
    pub fn locate(
        cwd: &Path,
        source_dir: Option<&Path>,
        build_dir_arg: &Path,
    ) -> Resolved<ProjectLocation> {
        let (root, diagnostics) = match source_dir {
            Some(dir) => (normalize_path(&cwd.join(dir)), Vec::new()),
            None => find_project_root(cwd).into_parts(),
        };

        let build_dir = resolve_build_dir(&root, build_dir_arg);

        Resolved {
            value: ProjectLocation { root, build_dir },
            diagnostics,
        }
    }

    /// Check whether the build directory has been configured.
    pub fn is_configured(&self) -> bool {
        is_configured(&self.build_dir)
    }

    /// Name of the root directory, used as the default target name.
    pub fn root_name(&self) -> Option<String> {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join(PROJECT_MARKER).exists()
}

/// Check if a build directory holds a CMake cache.
///
/// A missing cache is treated as "not yet configured"; a partially written
/// or corrupted one is not distinguished.
pub fn is_configured(build_dir: &Path) -> bool {
    build_dir.join(CONFIGURED_MARKER).exists()
}

/// Find the nearest directory at or above `start` that contains
/// CMakeLists.txt.
///
/// Falls back to `start`'s parent with a [`Warning::ProjectRootNotFound`]
/// when the filesystem root is reached without a match.
pub fn find_project_root(start: &Path) -> Resolved<PathBuf> {
    find_root_with(start, is_cmake_project)
}

/// Ancestor walk behind [`find_project_root`], with the marker check
/// supplied by the caller.
fn find_root_with(start: &Path, is_project: impl Fn(&Path) -> bool) -> Resolved<PathBuf> {
    for dir in start.ancestors() {
        if is_project(dir) {
            tracing::debug!("found {} in {}", PROJECT_MARKER, dir.display());
            return Resolved::ok(dir.to_path_buf());
        }
    }

    let fallback = start.parent().unwrap_or(start).to_path_buf();
    tracing::debug!(
        "no {} above {}, falling back to {}",
        PROJECT_MARKER,
        start.display(),
        fallback.display()
    );

    Resolved::degraded(
        fallback.clone(),
        Warning::ProjectRootNotFound {
            start: start.to_path_buf(),
            fallback,
        },
    )
}

/// Resolve the build directory against the project root.
///
/// No existence check; configure creates it.
pub fn resolve_build_dir(root: &Path, build_dir_arg: &Path) -> PathBuf {
    if build_dir_arg.is_absolute() {
        build_dir_arg.to_path_buf()
    } else {
        root.join(build_dir_arg)
    }
}
