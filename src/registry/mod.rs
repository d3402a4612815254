//! In-memory index of the programs in the managed directory.
//!
//! A [`Registry`] is built once per command from a fresh [`scan`](crate::scanner::scan)
//! and is never mutated afterwards. Commands that remove entries keep working
//! from the snapshot instead of re-querying it.

pub mod matcher;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, warn};

use crate::scanner::Entry;

pub use matcher::{Match, MatchMode, Resolution};

/// Bidirectional view over the program entries of one managed directory.
///
/// Indexes hold positions into `entries`, so every lookup ends at the
/// scanned entry and its on-disk path.
#[derive(Debug, Clone)]
pub struct Registry {
    /// The managed directory the entries were scanned from.
    bin_dir: PathBuf,
    /// Every scanned entry, directories and dotfiles included, in name order.
    entries: Vec<Entry>,
    /// Positions of program entries in name order.
    programs: Vec<usize>,
    /// Program name to entry position.
    name_index: HashMap<String, usize>,
    /// Absolute entry path to entry position.
    path_index: HashMap<PathBuf, usize>,
    /// Absolute link target to the positions of entries linking to it, in name order.
    target_index: HashMap<PathBuf, Vec<usize>>,
    /// Path of the entry that refers to the running executable, if any.
    self_entry: Option<PathBuf>,
}

impl Registry {
    /// Builds a registry and identifies which entry, if any, is the running program.
    ///
    /// Failing to resolve the running executable only disables self
    /// identification; it is logged and otherwise ignored.
    #[must_use]
    pub fn new(bin_dir: &Path, entries: Vec<Entry>) -> Self {
        let self_path = match std::env::current_exe().and_then(fs::canonicalize) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not resolve the running executable: {e}");
                None
            }
        };
        Self::with_self_path(bin_dir, entries, self_path.as_deref())
    }

    /// Builds a registry, comparing entries against an explicit, already
    /// canonical, path of the running program.
    #[must_use]
    pub fn with_self_path(bin_dir: &Path, entries: Vec<Entry>, self_path: Option<&Path>) -> Self {
        let span = span!(Level::DEBUG, "registry_build", dir = %bin_dir.display());
        let _guard = span.enter();

        let mut programs = Vec::new();
        let mut name_index = HashMap::new();
        let mut path_index = HashMap::new();
        let mut target_index: HashMap<PathBuf, Vec<usize>> = HashMap::new();

        for (pos, entry) in entries.iter().enumerate().filter(|(_, e)| e.is_program()) {
            programs.push(pos);
            name_index.insert(entry.name.clone(), pos);
            path_index.insert(entry.path.clone(), pos);
            if let Some(target) = entry.target() {
                target_index.entry(target.to_path_buf()).or_default().push(pos);
            }
        }

        let self_entry = self_path.and_then(|self_path| identify_self(&entries, self_path));
        debug!(programs = programs.len(), self_entry = ?self_entry, "Registry built");

        Self {
            bin_dir: bin_dir.to_path_buf(),
            entries,
            programs,
            name_index,
            path_index,
            target_index,
            self_entry,
        }
    }

    /// The managed directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// All scanned entries, including directories and dotfiles.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Program entries in name order.
    pub fn programs(&self) -> impl Iterator<Item = &Entry> {
        self.programs.iter().map(|&pos| &self.entries[pos])
    }

    /// Program entry called `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Entry> {
        self.name_index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Program entry stored at `path`.
    #[must_use]
    pub fn by_path(&self, path: &Path) -> Option<&Entry> {
        self.path_index.get(path).map(|&pos| &self.entries[pos])
    }

    /// Entries whose link resolves lexically to `target`, in name order.
    pub fn by_target(&self, target: &Path) -> impl Iterator<Item = &Entry> {
        self.target_index
            .get(target)
            .into_iter()
            .flatten()
            .map(|&pos| &self.entries[pos])
    }

    /// Whether the entry at `path` refers to the running program.
    #[must_use]
    pub fn is_self(&self, path: &Path) -> bool {
        self.self_entry.as_deref() == Some(path)
    }

    /// Every program as a match, in name order.
    #[must_use]
    pub fn all_matches(&self) -> Vec<Match> {
        self.programs().map(Match::from).collect()
    }
}

/// Finds the first program entry whose fully resolved path is `self_path`.
fn identify_self(entries: &[Entry], self_path: &Path) -> Option<PathBuf> {
    for entry in entries.iter().filter(|e| e.is_program()) {
        match fs::canonicalize(&entry.path) {
            Ok(resolved) if resolved == self_path => {
                debug!(name = %entry.name, "Identified running program");
                return Some(entry.path.clone());
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(name = %entry.name, "Skipping broken entry during self identification");
            }
            Err(e) => warn!("{}: {e}", entry.name),
        }
    }
    None
}
