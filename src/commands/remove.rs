use anyhow::Result;
use std::fs;

use crate::BinmanContext;
use crate::output::{Report, dim};
use crate::registry::{Match, MatchMode};

/// Execute remove command - delete every entry matching `programs`
///
/// Each matched entry is removed once, even when several arguments reach it.
/// The entry for the running program, if matched, is removed last.
///
/// # Errors
///
/// Returns an error if the managed directory cannot be scanned or an
/// argument cannot be resolved to an absolute path.
pub fn execute(
    ctx: &BinmanContext,
    programs: &[String],
    mode: MatchMode,
    quiet: bool,
    report: &mut Report,
) -> Result<()> {
    let registry = ctx.registry()?;
    let resolution = registry.resolve(programs, mode)?;

    if !quiet {
        for arg in &resolution.unmatched {
            report.error(format_args!("{arg}: no match found"));
        }
    }

    let (own, others): (Vec<Match>, Vec<Match>) = resolution
        .matches
        .into_iter()
        .partition(|m| registry.is_self(&m.path));

    for m in &others {
        remove_one(m, false, report);
    }
    for m in &own {
        remove_one(m, true, report);
    }

    Ok(())
}

fn remove_one(m: &Match, is_self: bool, report: &mut Report) {
    let suffix = if is_self {
        format!(" {}", dim("(self)"))
    } else {
        String::new()
    };
    match super::describe(m, false, true) {
        Ok(line) => println!("Removing {line}{suffix}"),
        Err(e) => {
            println!("Removing {}{suffix}", m.name);
            report.error(format_args!("{}: {e}", m.name));
        }
    }

    if let Err(e) = fs::remove_file(&m.path) {
        report.error(format_args!("{}: {e}", m.name));
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_remove_by_target_removes_every_alias_once() -> Result<()> {
        let dir = TempDir::new()?;
        let root = fs::canonicalize(dir.path())?;
        let bin = root.join("bin");
        fs::create_dir_all(&bin)?;
        fs::write(root.join("x"), "")?;
        symlink("../x", bin.join("a"))?;
        symlink("../x", bin.join("b"))?;
        let ctx = BinmanContext::new_explicit(bin.clone(), Config::default())?;
        let target = root.join("x").to_string_lossy().into_owned();
        let mut report = Report::new();

        // A second removal of the same entry would fail with NotFound
        execute(&ctx, &[target.clone(), target], MatchMode::Both, false, &mut report)?;

        assert!(!report.failed());
        assert!(fs::read_dir(&bin)?.next().is_none());
        Ok(())
    }

    #[test]
    fn test_direct_mode_ignores_targets() -> Result<()> {
        let dir = TempDir::new()?;
        let root = fs::canonicalize(dir.path())?;
        let bin = root.join("bin");
        fs::create_dir_all(&bin)?;
        fs::write(root.join("x"), "")?;
        symlink("../x", bin.join("a"))?;
        let ctx = BinmanContext::new_explicit(bin.clone(), Config::default())?;
        let target = root.join("x").to_string_lossy().into_owned();
        let mut report = Report::new();

        execute(&ctx, &[target], MatchMode::NameAndPath, false, &mut report)?;

        assert!(report.failed());
        assert!(fs::symlink_metadata(bin.join("a")).is_ok());
        Ok(())
    }

    #[test]
    fn test_unmatched_is_reported_unless_quiet() -> Result<()> {
        let dir = TempDir::new()?;
        let bin = fs::canonicalize(dir.path())?.join("bin");
        let ctx = BinmanContext::new_explicit(bin, Config::default())?;

        let mut report = Report::new();
        execute(&ctx, &["nothing".into()], MatchMode::Both, true, &mut report)?;
        assert!(!report.failed());

        execute(&ctx, &["nothing".into()], MatchMode::Both, false, &mut report)?;
        assert!(report.failed());
        Ok(())
    }

    #[test]
    fn test_remove_non_utf8_entry_by_target() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new()?;
        let root = fs::canonicalize(dir.path())?;
        let bin = root.join("bin");
        fs::create_dir_all(&bin)?;
        fs::write(root.join("x"), "")?;
        symlink("../x", bin.join(OsStr::from_bytes(b"bad\xff")))?;
        let ctx = BinmanContext::new_explicit(bin.clone(), Config::default())?;
        let target = root.join("x").to_string_lossy().into_owned();
        let mut report = Report::new();

        execute(&ctx, &[target], MatchMode::TargetOnly, false, &mut report)?;

        assert!(!report.failed());
        assert!(fs::read_dir(&bin)?.next().is_none());
        Ok(())
    }
}
