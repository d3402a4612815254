//! Detection of symlink entries whose target is gone.

use anyhow::{Error, anyhow};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use crate::registry::Registry;

/// A symlink entry whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Entry name, for display.
    pub name: String,
    /// The entry as stored on disk.
    pub path: PathBuf,
    /// Absolute link target that is missing.
    pub target: PathBuf,
}

/// Symlinks found broken in one registry snapshot.
#[derive(Debug, Default)]
pub struct BrokenLinks {
    /// Broken entries in name order.
    pub broken: Vec<BrokenLink>,
    /// Entries whose state could not be determined.
    pub errors: Vec<Error>,
}

/// Collects every symlink entry whose link chain does not end at an existing file.
///
/// All entries are checked before anything is removed, so removing one entry
/// cannot change the verdict for another. Dotfiles are never considered.
#[must_use]
pub fn find_broken(registry: &Registry) -> BrokenLinks {
    let mut result = BrokenLinks::default();

    for entry in registry.programs() {
        let Some(link) = &entry.link else {
            continue;
        };
        match fs::metadata(&entry.path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(name = %entry.name, "Broken symlink");
                result.broken.push(BrokenLink {
                    name: entry.name.clone(),
                    path: entry.path.clone(),
                    target: link.target.clone(),
                });
            }
            Err(e) => result.errors.push(anyhow!("{}: {e}", entry.name)),
        }
    }

    result
}
