//! Single-pass reader for the managed directory.
//!
//! Every top-level item is classified once; nothing below the top level is
//! visited. Symlink text is read here so later stages never touch `readlink`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

use crate::utils::paths::{is_hidden_name, resolve_link_text};

/// Classification of one item in the managed directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, expected to be executable.
    Regular,
    /// A symlink, expected to point at an executable.
    Symlink,
    /// A directory. Never a program.
    Directory,
    /// A dotfile. Never a program.
    Hidden,
}

/// Link information for a symlink entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The link text exactly as stored on disk.
    pub stored: PathBuf,
    /// The link text resolved against the managed directory.
    pub target: PathBuf,
}

/// One top-level item in the managed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Base file name, unique within the directory.
    pub name: String,
    /// Kind of the item, taken from `lstat` (links are not followed).
    pub kind: EntryKind,
    /// `managed_dir/name`.
    pub path: PathBuf,
    /// Present exactly when `kind` is [`EntryKind::Symlink`].
    pub link: Option<Link>,
}

impl Entry {
    /// Whether this entry takes part in program semantics.
    #[must_use]
    pub fn is_program(&self) -> bool {
        matches!(self.kind, EntryKind::Regular | EntryKind::Symlink)
    }

    /// Absolute link target, if this entry is a symlink.
    #[must_use]
    pub fn target(&self) -> Option<&Path> {
        self.link.as_ref().map(|link| link.target.as_path())
    }
}

/// Reads `dir` and returns its entries sorted by name.
///
/// The directory is created when it does not exist yet. A symlink whose text
/// cannot be read fails the whole scan.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or listed, or if any
/// symlink in it cannot be read.
pub fn scan(dir: &Path) -> Result<Vec<Entry>> {
    let span = span!(Level::DEBUG, "scan", dir = %dir.display());
    let _guard = span.enter();

    if !dir.exists() {
        debug!("Creating missing managed directory");
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let read_dir = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.with_context(|| format!("reading {}", dir.display()))?;
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        let path = dir_entry.path();
        let file_type = dir_entry
            .file_type()
            .with_context(|| format!("{name}: failed to read file type"))?;

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if is_hidden_name(&name) {
            EntryKind::Hidden
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Regular
        };

        let link = if kind == EntryKind::Symlink {
            let stored = fs::read_link(&path).with_context(|| format!("{name}: reading link"))?;
            let target = resolve_link_text(dir, &stored);
            Some(Link { stored, target })
        } else {
            None
        };

        entries.push(Entry {
            name,
            kind,
            path,
            link,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = entries.len(), "Scan complete");

    Ok(entries)
}
