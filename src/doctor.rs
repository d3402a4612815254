//! Structural checks over the managed directory.
//!
//! Every entry is checked on its own. An entry that is a directory, broken,
//! unreadable or not executable gets that single issue; an entry that does
//! resolve to an executable is then checked for an absolute link and for a
//! duplicate target, and may get both.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{Level, debug, span};

use crate::registry::Registry;
use crate::scanner::EntryKind;
use crate::utils::permissions::is_executable;

/// What is wrong with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The managed directory must not contain directories.
    UnexpectedDirectory,
    /// The symlink chain ends nowhere.
    BrokenSymlink,
    /// The entry, or what it links to, has no execute bit.
    NotExecutable,
    /// The symlink stores an absolute path.
    AbsoluteSymlink,
    /// Another entry, earlier in name order, already links to the same target.
    DuplicateTarget {
        /// Name of the earlier entry.
        first: String,
    },
    /// The entry could not be inspected.
    Unreadable(String),
}

/// A single problem found by [`diagnose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Full path of the offending entry.
    pub path: PathBuf,
    /// The problem.
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            IssueKind::UnexpectedDirectory => write!(f, "{path}: unexpected directory"),
            IssueKind::BrokenSymlink => write!(f, "{path}: broken symlink"),
            IssueKind::NotExecutable => write!(f, "{path}: not an executable"),
            IssueKind::AbsoluteSymlink => {
                write!(f, "{path}: symlink is absolute (should be relative)")
            }
            IssueKind::DuplicateTarget { first } => {
                write!(f, "{path}: same target as {first}")
            }
            IssueKind::Unreadable(err) => write!(f, "{path}: {err}"),
        }
    }
}

/// Checks every entry of the snapshot and returns all issues in name order.
#[must_use]
pub fn diagnose(registry: &Registry) -> Vec<Issue> {
    let span = span!(Level::DEBUG, "doctor", dir = %registry.bin_dir().display());
    let _guard = span.enter();

    let mut issues = Vec::new();
    for entry in registry.entries() {
        let issue = |kind| Issue {
            path: entry.path.clone(),
            kind,
        };

        match entry.kind {
            EntryKind::Directory => {
                issues.push(issue(IssueKind::UnexpectedDirectory));
                continue;
            }
            EntryKind::Hidden => continue,
            EntryKind::Regular | EntryKind::Symlink => {}
        }

        match fs::metadata(&entry.path) {
            Err(e) if entry.kind == EntryKind::Symlink && e.kind() == ErrorKind::NotFound => {
                issues.push(issue(IssueKind::BrokenSymlink));
                continue;
            }
            Err(e) => {
                issues.push(issue(IssueKind::Unreadable(e.to_string())));
                continue;
            }
            Ok(metadata) if !is_executable(&metadata) => {
                issues.push(issue(IssueKind::NotExecutable));
                continue;
            }
            Ok(_) => {}
        }

        let Some(link) = &entry.link else {
            continue;
        };
        if link.stored.is_absolute() {
            issues.push(issue(IssueKind::AbsoluteSymlink));
        }
        if let Some(first) = registry.by_target(&link.target).next()
            && first.path != entry.path
        {
            issues.push(issue(IssueKind::DuplicateTarget {
                first: first.name.clone(),
            }));
        }
    }

    debug!(issues = issues.len(), "Doctor finished");
    issues
}
