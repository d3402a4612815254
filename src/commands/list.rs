use anyhow::Result;

use crate::BinmanContext;
use crate::output::Report;
use crate::registry::MatchMode;

/// Flags accepted by `list`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Print full entry paths instead of names.
    pub show_path: bool,
    /// Print symlink targets.
    pub long: bool,
    /// Which lookups arguments go through.
    pub mode: MatchMode,
    /// Do not report arguments that match nothing.
    pub quiet: bool,
}

/// Execute list command - print every program, or those matching `programs`
///
/// # Errors
///
/// Returns an error if the managed directory cannot be scanned.
pub fn execute(
    ctx: &BinmanContext,
    programs: &[String],
    options: ListOptions,
    report: &mut Report,
) -> Result<()> {
    let registry = ctx.registry()?;

    let matches = if programs.is_empty() {
        registry.all_matches()
    } else {
        let resolution = registry.resolve(programs, options.mode)?;
        if !options.quiet {
            for arg in &resolution.unmatched {
                report.error(format_args!("{arg}: no match found"));
            }
        }
        resolution.matches
    };

    for m in &matches {
        match super::describe(m, options.show_path, options.long) {
            Ok(line) => println!("{line}"),
            Err(e) => report.error(format_args!("{}: {e}", m.name)),
        }
    }

    Ok(())
}
