//! Resolution of user supplied program arguments to registry entries.
//!
//! An argument may be a program name, a path to an entry, or the path a
//! symlink entry points at. Which of those are tried is selected by
//! [`MatchMode`].

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

use super::Registry;
use crate::scanner::Entry;
use crate::utils::paths::make_absolute;

/// Which lookups an argument goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Match by entry name or entry path only (`--direct`).
    NameAndPath,
    /// Match by link target only (`--target`).
    TargetOnly,
    /// Try name, then path, then target.
    #[default]
    Both,
}

impl MatchMode {
    /// Builds the mode from the `--direct` and `--target` flags.
    ///
    /// # Errors
    ///
    /// Returns an error if both flags are set.
    pub fn from_flags(direct: bool, target: bool) -> Result<Self> {
        match (direct, target) {
            (true, true) => bail!("cannot use --direct and --target together"),
            (true, false) => Ok(Self::NameAndPath),
            (false, true) => Ok(Self::TargetOnly),
            (false, false) => Ok(Self::Both),
        }
    }

    const fn by_name_or_path(self) -> bool {
        matches!(self, Self::NameAndPath | Self::Both)
    }

    const fn by_target(self) -> bool {
        matches!(self, Self::TargetOnly | Self::Both)
    }
}

/// One concrete registry entry an argument resolved to.
///
/// Matches are plain values; they stay valid after the entry is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Entry name within the managed directory, for display.
    pub name: String,
    /// The entry as stored on disk.
    pub path: PathBuf,
    /// Absolute link target, `None` for regular files.
    pub target: Option<PathBuf>,
}

impl From<&Entry> for Match {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            target: entry.target().map(Path::to_path_buf),
        }
    }
}

/// The result of resolving a batch of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matches in argument order, each entry at most once.
    pub matches: Vec<Match>,
    /// Arguments that matched nothing, in argument order.
    pub unmatched: Vec<String>,
}

impl Registry {
    /// Resolves one argument to every entry it refers to.
    ///
    /// The result may hold the same entry twice when it is reached both by
    /// name and by path; use [`Registry::resolve`] for deduplicated batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument cannot be made absolute.
    pub fn find(&self, arg: &str, mode: MatchMode) -> Result<Vec<Match>> {
        let span = span!(Level::DEBUG, "find", arg, mode = ?mode);
        let _guard = span.enter();

        let abs = make_absolute(Path::new(arg))?;
        let mut matches = Vec::new();

        if mode.by_name_or_path() {
            if let Some(entry) = self.by_name(arg) {
                debug!("Matched by name");
                matches.push(Match::from(entry));
            }
            if let Some(entry) = self.by_path(&abs) {
                debug!("Matched by entry path");
                matches.push(Match::from(entry));
            }
        }

        if mode.by_target() {
            for entry in self.by_target(&abs) {
                debug!(name = %entry.name, "Matched by link target");
                matches.push(Match::from(entry));
            }
        }

        Ok(matches)
    }

    /// Resolves a batch of arguments, visiting each entry at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if any argument cannot be made absolute.
    pub fn resolve<S: AsRef<str>>(&self, args: &[S], mode: MatchMode) -> Result<Resolution> {
        let mut seen = HashSet::new();
        let mut resolution = Resolution::default();

        for arg in args {
            let arg = arg.as_ref();
            let found = self.find(arg, mode)?;
            if found.is_empty() {
                resolution.unmatched.push(arg.to_string());
            }
            for m in found {
                if seen.insert(m.path.clone()) {
                    resolution.matches.push(m);
                }
            }
        }

        Ok(resolution)
    }
}
