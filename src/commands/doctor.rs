use anyhow::Result;

use crate::BinmanContext;
use crate::doctor::diagnose;
use crate::output::Report;

/// Execute doctor command - check the managed directory for issues
///
/// Every issue is reported; none of them stops the check.
///
/// # Errors
///
/// Returns an error if the managed directory cannot be scanned.
pub fn execute(ctx: &BinmanContext, report: &mut Report) -> Result<()> {
    let registry = ctx.registry()?;
    let issues = diagnose(&registry);

    for issue in &issues {
        report.error(issue);
    }

    if issues.is_empty() {
        super::print_success(&format!(
            "No issues found in {} ({} programs)",
            registry.bin_dir().display(),
            registry.programs().count()
        ));
    } else {
        super::print_info(&format!("Found {} issue(s)", issues.len()));
    }

    Ok(())
}
