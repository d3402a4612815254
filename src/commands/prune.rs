use anyhow::Result;
use std::fs;

use crate::BinmanContext;
use crate::output::{Report, broken_target, dim};
use crate::prune::find_broken;

/// Execute prune command - remove symlinks whose target no longer exists
///
/// # Errors
///
/// Returns an error if the managed directory cannot be scanned.
pub fn execute(ctx: &BinmanContext, report: &mut Report) -> Result<()> {
    let registry = ctx.registry()?;
    let found = find_broken(&registry);

    for error in &found.errors {
        report.error(error);
    }

    for link in &found.broken {
        println!(
            "Removing {} {} {} {}",
            link.name,
            dim("->"),
            broken_target(&link.target),
            dim("(broken)")
        );
        if let Err(e) = fs::remove_file(&link.path) {
            report.error(format_args!("{}: {e}", link.name));
        }
    }

    Ok(())
}
