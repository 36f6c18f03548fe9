//! Configuration file support for cmrun.
//!
//! cmrun reads two configuration file locations:
//! - Global: `~/.cmrun/config.toml` - User-wide defaults
//! - Project: `<root>/.cmrun/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::BuildConfig;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR: &str = ".cmrun";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// cmrun configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildSection,

    /// Child environment settings
    pub env: EnvSection,

    /// Toolchain settings
    pub toolchain: ToolchainSection,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Build directory, relative to the project root
    pub build_dir: Option<PathBuf>,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    pub config: Option<BuildConfig>,

    /// CMake generator passed as `-G`
    pub generator: Option<String>,

    /// Executable target name
    pub target: Option<String>,

    /// Parallel build jobs
    pub parallel: Option<usize>,

    /// Extra arguments appended to the configure command
    pub cmake_args: Vec<String>,
}

/// Environment-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSection {
    /// Set UTF-8 defaults (PYTHONIOENCODING, PYTHONUTF8, LANG)
    pub force_utf8: Option<bool>,

    /// Set color defaults (CLICOLOR, FORCE_COLOR, CLICOLOR_FORCE, ...)
    pub force_color: Option<bool>,
}

/// CUDA toolchain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSection {
    /// Explicit CUDA toolkit root
    pub cuda_root: Option<PathBuf>,

    /// CUDA version used to derive the default toolkit root (e.g. "12.4")
    pub cuda_version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Build settings
        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.config.is_some() {
            self.build.config = other.build.config;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.target.is_some() {
            self.build.target = other.build.target;
        }
        if other.build.parallel.is_some() {
            self.build.parallel = other.build.parallel;
        }
        // Replaced, not appended
        if !other.build.cmake_args.is_empty() {
            self.build.cmake_args = other.build.cmake_args;
        }

        // Env settings
        if other.env.force_utf8.is_some() {
            self.env.force_utf8 = other.env.force_utf8;
        }
        if other.env.force_color.is_some() {
            self.env.force_color = other.env.force_color;
        }

        // Toolchain settings
        if other.toolchain.cuda_root.is_some() {
            self.toolchain.cuda_root = other.toolchain.cuda_root;
        }
        if other.toolchain.cuda_version.is_some() {
            self.toolchain.cuda_version = other.toolchain.cuda_version;
        }
    }

    /// Whether child processes get the UTF-8 defaults.
    pub fn force_utf8(&self) -> bool {
        self.env.force_utf8.unwrap_or(true)
    }

    /// Whether child processes get the color defaults.
    pub fn force_color(&self) -> bool {
        self.env.force_color.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cmrun/config.toml)
/// 2. Global config (~/.cmrun/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if let Some(global_path) = global_path {
        tracing::debug!("global config: {}", global_path.display());
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    tracing::debug!("project config: {}", project_path.display());
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global cmrun config directory (~/.cmrun).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.cmrun/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the project config path (<root>/.cmrun/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.build_dir.is_none());
        assert!(config.build.config.is_none());
        assert!(config.build.cmake_args.is_empty());
        assert!(config.force_utf8());
        assert!(config.force_color());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
build_dir = "out"
config = "release"
generator = "Ninja"
target = "demo"
parallel = 8
cmake_args = ["-DFOO=ON"]

[env]
force_color = false

[toolchain]
cuda_version = "12.4"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.build_dir, Some(PathBuf::from("out")));
        assert_eq!(config.build.config, Some(BuildConfig::Release));
        assert_eq!(config.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(config.build.target.as_deref(), Some("demo"));
        assert_eq!(config.build.parallel, Some(8));
        assert_eq!(config.build.cmake_args, vec!["-DFOO=ON"]);
        assert!(config.force_utf8());
        assert!(!config.force_color());
        assert_eq!(config.toolchain.cuda_version.as_deref(), Some("12.4"));
    }

    #[test]
    fn test_config_rejects_unknown_build_type() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[build]\nconfig = \"Fastest\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("nope.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.generator = Some("Unix Makefiles".to_string());
        base.build.parallel = Some(4);
        base.build.cmake_args = vec!["-DA=1".to_string()];

        let mut override_cfg = Config::default();
        override_cfg.build.generator = Some("Ninja".to_string());
        override_cfg.build.cmake_args = vec!["-DB=2".to_string()];
        override_cfg.env.force_utf8 = Some(false);

        base.merge(override_cfg);

        assert_eq!(base.build.generator.as_deref(), Some("Ninja"));
        assert_eq!(base.build.parallel, Some(4)); // Not overridden
        assert_eq!(base.build.cmake_args, vec!["-DB=2"]);
        assert!(!base.force_utf8());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[build]
config = "Release"
parallel = 2

[toolchain]
cuda_version = "11.8"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[build]
config = "MinSizeRel"

[toolchain]
cuda_version = "12.4"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        assert_eq!(config.build.config, Some(BuildConfig::MinSizeRel));
        assert_eq!(config.build.parallel, Some(2));
        assert_eq!(config.toolchain.cuda_version.as_deref(), Some("12.4"));
    }

    #[test]
    fn test_malformed_project_config_keeps_global() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(&global_path, "[build]\ntarget = \"demo\"\n").unwrap();
        std::fs::write(&project_path, "[build\ntarget = ").unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.build.target.as_deref(), Some("demo"));
    }

    #[test]
    fn test_project_config_path() {
        let root = Path::new("proj");
        assert_eq!(
            project_config_path(root),
            root.join(".cmrun").join("config.toml")
        );
    }
}
