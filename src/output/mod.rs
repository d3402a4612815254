//! Output formatting and styling for binman.
//!
//! Result lines go to stdout, errors to stderr. Colour is dropped when stdout
//! is not a terminal or `NO_COLOR` is set.

use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::Path;

/// Disables colour when stdout is not a terminal.
///
/// `colored` already honours `NO_COLOR` and `CLICOLOR_FORCE` on its own.
pub fn configure_color() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Dimmed decoration: arrows, `from`, and parenthesised notes.
#[must_use]
pub fn dim(text: &str) -> ColoredString {
    text.bright_black()
}

/// A link target or install source that exists.
#[must_use]
pub fn target(path: &Path) -> ColoredString {
    path.display().to_string().blue()
}

/// A link target that does not exist.
#[must_use]
pub fn broken_target(path: &Path) -> ColoredString {
    path.display().to_string().red()
}

/// Accumulates whether any error was reported during a command.
///
/// Errors are printed as they happen; processing continues and the final
/// exit status is derived from [`Report::failed`].
#[derive(Debug, Default)]
pub struct Report {
    /// Number of errors printed so far.
    errors: usize,
}

impl Report {
    /// Creates a report with no errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints an error to stderr and marks the command as failed.
    pub fn error(&mut self, message: impl Display) {
        eprintln!("{message}");
        self.errors += 1;
    }

    /// Whether any error was reported.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.errors > 0
    }
}
