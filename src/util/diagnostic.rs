//! User-friendly diagnostic messages.
//!
//! Resolution never fails outright. When it has to guess, it hands back the
//! guess together with a [`Warning`], and the caller decides whether to print
//! it, log it, or escalate it.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Common suggestion messages for consistent output.
pub mod suggestions {
    /// Suggestion when no CMakeLists.txt is found above the start directory.
    pub const NO_PROJECT_ROOT: &str = "pass `--source-dir <DIR>` to point at the project root";

    /// Suggestion when the CUDA toolkit root is missing.
    pub const NO_TOOLCHAIN: &str =
        "pass `--cuda-root <DIR>` or `--cuda-version <X.Y>` for an installed toolkit";

    /// Suggestion when the executable was not built yet.
    pub const NO_EXECUTABLE: &str = "run `cmrun build` first, or check `--target`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A recoverable problem found while resolving paths or composing the
/// child environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// No ancestor of `start` contains CMakeLists.txt.
    #[error("CMakeLists.txt not found upward from {}; falling back to {}", start.display(), fallback.display())]
    ProjectRootNotFound { start: PathBuf, fallback: PathBuf },

    /// The CUDA toolkit root does not exist.
    #[error("CUDA toolkit root not found: {}", root.display())]
    ToolchainNotFound { root: PathBuf },

    /// The toolkit root exists but has no compiler where one is expected.
    #[error("CUDA compiler not found at: {}", compiler.display())]
    CompilerNotFound { compiler: PathBuf },

    /// None of the candidate executable paths exist yet.
    #[error("executable not found at: {}", path.display())]
    ExecutableNotFound { path: PathBuf },
}

impl Warning {
    /// Convert into a printable diagnostic with a suggested fix.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.to_string());
        match self {
            Warning::ProjectRootNotFound { .. } => {
                diag.with_suggestion(suggestions::NO_PROJECT_ROOT)
            }
            Warning::ToolchainNotFound { .. } => diag
                .with_context("continuing without CUDA toolchain wiring")
                .with_suggestion(suggestions::NO_TOOLCHAIN),
            Warning::CompilerNotFound { compiler } => diag
                .with_location(compiler)
                .with_context("continuing without CUDA toolchain wiring")
                .with_suggestion(suggestions::NO_TOOLCHAIN),
            Warning::ExecutableNotFound { .. } => {
                diag.with_suggestion(suggestions::NO_EXECUTABLE)
            }
        }
    }
}

/// A best-effort value plus whatever went wrong while computing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub diagnostics: Vec<Warning>,
}

impl<T> Resolved<T> {
    /// A clean result.
    pub fn ok(value: T) -> Self {
        Resolved {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// A fallback result carrying one warning.
    pub fn degraded(value: T, warning: Warning) -> Self {
        Resolved {
            value,
            diagnostics: vec![warning],
        }
    }

    /// Check whether resolution had to fall back anywhere.
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Split into value and diagnostics.
    pub fn into_parts(self) -> (T, Vec<Warning>) {
        (self.value, self.diagnostics)
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
