//! Centralized shell output.
//!
//! Every user-facing line goes through [`Shell`]: status messages are
//! right-aligned to a 12 column gutter, colored when the terminal allows
//! it, and suppressed in quiet mode. Child processes write to the inherited
//! streams directly and never pass through here.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use crate::util::diagnostic::{self, Warning};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus debug info
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Finished,

    // In-progress (cyan)
    Configuring,
    Building,
    Running,

    // Info (blue)
    Info,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Running => "Running",
            Status::Info => "Info",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished => "\x1b[1;32m",
            Status::Configuring | Status::Building | Status::Running => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
        }
    }

    /// Width of the right-aligned status gutter.
    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Check if colors are enabled for our own output.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. Nothing prints in quiet mode;
    /// fatal errors are reported by the caller.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print a recoverable diagnostic with its suggestions.
    pub fn diagnostic(&self, warning: &Warning) {
        tracing::debug!(?warning, "diagnostic");
        if self.is_quiet() {
            return;
        }
        diagnostic::emit(&warning.to_diagnostic(), self.use_color);
    }

    /// Print every diagnostic in order.
    pub fn diagnostics<'a>(&self, warnings: impl IntoIterator<Item = &'a Warning>) {
        for warning in warnings {
            self.diagnostic(warning);
        }
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Start a timed span; its end is reported by [`Span::finish`].
    pub fn span(&self, what: impl Display) -> Span<'_> {
        Span {
            shell: self,
            what: what.to_string(),
            start: Instant::now(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// A timed section of work.
pub struct Span<'a> {
    shell: &'a Shell,
    what: String,
    start: Instant,
}

impl Span<'_> {
    /// Report completion with the elapsed time.
    pub fn finish(self) {
        let elapsed = self.start.elapsed();
        self.shell.status(
            Status::Finished,
            format!("{} in {}", self.what, format_duration(elapsed)),
        );
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
