use anyhow::{Context, Result, bail};
use std::fs;

use crate::BinmanContext;
use crate::install::{InstallPlan, Outcome, PlacementMode};
use crate::output::{Report, dim, target};

/// Flags accepted by `install`.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Replace whatever occupies the destination.
    pub force: bool,
    /// Copy instead of symlinking.
    pub copy: bool,
    /// Move instead of symlinking.
    pub move_: bool,
    /// Drop the source's extension from the entry name.
    pub no_ext: bool,
    /// Entry name for a single program.
    pub rename: Option<String>,
}

/// Execute install command - place each program in the managed directory
///
/// A failing program is reported and the remaining programs are still
/// installed.
///
/// # Errors
///
/// Returns an error if:
/// - `--copy` and `--move` are combined, or `--no-ext` and `--rename`
/// - `--rename` is given with more than one program
/// - The managed directory cannot be created
pub fn execute(
    ctx: &BinmanContext,
    programs: &[String],
    options: &InstallOptions,
    report: &mut Report,
) -> Result<()> {
    if options.copy && options.move_ {
        bail!("install: cannot use --copy and --move together");
    }
    if options.no_ext && options.rename.is_some() {
        bail!("install: cannot use --no-ext and --rename together");
    }
    if options.rename.is_some() && programs.len() != 1 {
        bail!("install: --rename requires a single program");
    }

    let mode = PlacementMode::from_flags(options.copy, options.move_, ctx.config.install.mode);
    let strip_extension =
        options.no_ext || (ctx.config.install.no_ext && options.rename.is_none());

    fs::create_dir_all(ctx.bin_dir())
        .with_context(|| format!("Failed to create {}", ctx.bin_dir().display()))?;

    for arg in programs {
        let plan = match InstallPlan::prepare(
            ctx.bin_dir(),
            arg,
            strip_extension,
            options.rename.as_deref(),
        ) {
            Ok(plan) => plan,
            Err(e) => {
                report.error(format_args!("{arg}: {e:#}"));
                continue;
            }
        };

        let line = format!(
            "{} {} {} {}",
            mode.verb(),
            plan.name,
            dim(mode.joiner()),
            target(&plan.source)
        );
        match plan.place(mode, options.force) {
            Ok(Outcome::Installed) => println!("{line}"),
            Ok(Outcome::AlreadyInstalled) => println!("{line} {}", dim("(already installed)")),
            Err(e) => {
                println!("{line}");
                report.error(format_args!("{arg}: {e:#}"));
            }
        }
    }

    Ok(())
}
