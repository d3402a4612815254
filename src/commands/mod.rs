pub mod doctor;
pub mod install;
pub mod list;
pub mod path;
pub mod prune;
pub mod remove;

use colored::Colorize;
use std::fs;
use std::io::{self, ErrorKind};

use crate::output::{broken_target, dim, target};
use crate::registry::Match;

/// Prints a success line prefixed with a check mark.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an informational line.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Formats a match the way `list` prints it.
///
/// With `show_target`, symlink entries get `-> TARGET`, plus `(broken)` when
/// the target does not exist.
///
/// # Errors
///
/// Returns an error if the target exists but cannot be inspected.
pub fn describe(m: &Match, show_path: bool, show_target: bool) -> io::Result<String> {
    let program = if show_path {
        m.path.display().to_string()
    } else {
        m.name.clone()
    };

    let Some(link_target) = m.target.as_deref().filter(|_| show_target) else {
        return Ok(program);
    };

    match fs::metadata(link_target) {
        Ok(_) => Ok(format!("{program} {} {}", dim("->"), target(link_target))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(format!(
            "{program} {} {} {}",
            dim("->"),
            broken_target(link_target),
            dim("(broken)")
        )),
        Err(e) => Err(e),
    }
}
