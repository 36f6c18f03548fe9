//! CUDA toolkit detection for Windows builds.
//!
//! On Windows the CUDA toolkit is usually not on `PATH` for a plain shell,
//! so CMake cannot find `nvcc` on its own. Given the toolkit root, the
//! environment composer wires the compiler in explicitly.

use std::path::{Path, PathBuf};

use crate::core::platform::Platform;
use crate::util::diagnostic::Warning;

/// Default install location of versioned CUDA toolkits on Windows.
pub const CUDA_WINDOWS_BASE: &str = r"C:\Program Files\NVIDIA GPU Computing Toolkit\CUDA";

/// Root directory of the toolkit for `version` (e.g. `12.4` -> `...\CUDA\v12.4`).
pub fn default_cuda_root(version: &str) -> PathBuf {
    let version = version.trim_start_matches(['v', 'V']);
    Path::new(CUDA_WINDOWS_BASE).join(format!("v{}", version))
}

/// A verified CUDA toolkit installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CudaToolchain {
    /// Toolkit root (`CUDA_PATH`)
    pub root: PathBuf,
    /// Path to nvcc
    pub nvcc: PathBuf,
}

impl CudaToolchain {
    /// Expected location of nvcc under `root`.
    pub fn compiler_path(root: &Path, platform: Platform) -> PathBuf {
        root.join("bin").join(platform.exe_name("nvcc"))
    }

    /// Verify that `root` exists and holds a compiler.
    pub fn verify(root: &Path, platform: Platform) -> Result<Self, Warning> {
        if !root.is_dir() {
            return Err(Warning::ToolchainNotFound {
                root: root.to_path_buf(),
            });
        }

        let nvcc = Self::compiler_path(root, platform);
        if !nvcc.is_file() {
            return Err(Warning::CompilerNotFound { compiler: nvcc });
        }

        Ok(CudaToolchain {
            root: root.to_path_buf(),
            nvcc,
        })
    }

    /// Directory to put in front of `PATH`.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_cuda_root() {
        let root = default_cuda_root("12.4");
        assert!(root.ends_with("v12.4"));
        assert!(root.starts_with(CUDA_WINDOWS_BASE));

        assert_eq!(default_cuda_root("v11.8"), default_cuda_root("11.8"));
    }

    #[test]
    fn test_verify_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cuda");

        assert_eq!(
            CudaToolchain::verify(&root, Platform::Windows),
            Err(Warning::ToolchainNotFound { root })
        );
    }

    #[test]
    fn test_verify_missing_compiler() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("bin")).unwrap();

        let err = CudaToolchain::verify(tmp.path(), Platform::Windows).unwrap_err();
        assert_eq!(
            err,
            Warning::CompilerNotFound {
                compiler: tmp.path().join("bin").join("nvcc.exe")
            }
        );
    }

    #[test]
    fn test_verify_ok() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("bin")).unwrap();
        fs::write(tmp.path().join("bin").join("nvcc.exe"), "").unwrap();

        let cuda = CudaToolchain::verify(tmp.path(), Platform::Windows).unwrap();
        assert_eq!(cuda.nvcc, tmp.path().join("bin").join("nvcc.exe"));
        assert_eq!(cuda.bin_dir(), tmp.path().join("bin"));
    }
}
