//! Host platform and CMake build configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The platform family the build targets.
///
/// Passed explicitly into every resolution function so that Windows layouts
/// can be exercised from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    /// Any other Unix-like host (macOS, the BSDs)
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Suffix appended to executable file names.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Linux | Platform::Unix => "",
        }
    }

    /// Separator between entries of the `PATH` variable.
    pub fn path_separator(self) -> &'static str {
        match self {
            Platform::Windows => ";",
            Platform::Linux | Platform::Unix => ":",
        }
    }

    /// Whether the `C.UTF-8` locale ships with the C library.
    pub fn has_c_utf8_locale(self) -> bool {
        self == Platform::Linux
    }

    /// File name of an executable called `stem`.
    pub fn exe_name(self, stem: &str) -> String {
        format!("{}{}", stem, self.exe_suffix())
    }
}

/// CMake build type (`CMAKE_BUILD_TYPE` / `--config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildConfig {
    #[default]
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildConfig {
    pub const ALL: [BuildConfig; 4] = [
        BuildConfig::Debug,
        BuildConfig::Release,
        BuildConfig::RelWithDebInfo,
        BuildConfig::MinSizeRel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
            BuildConfig::RelWithDebInfo => "RelWithDebInfo",
            BuildConfig::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildConfig::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "invalid build config '{}'; expected one of Debug, Release, RelWithDebInfo, MinSizeRel",
                    s
                )
            })
    }
}

impl TryFrom<String> for BuildConfig {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildConfig> for String {
    fn from(config: BuildConfig) -> Self {
        config.as_str().to_string()
    }
}
