//! Placement of source executables into the managed directory.
//!
//! Installing is split in two steps. [`InstallPlan::prepare`] validates the
//! source and derives the entry name without touching the managed directory;
//! [`InstallPlan::place`] then decides between a write, a no-op and a conflict
//! for the chosen [`PlacementMode`].

mod error;

pub use error::InstallError;

use serde::Deserialize;
use std::fs::{self, File, Metadata};
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

use crate::utils::paths::{base_name, is_hidden_name, make_absolute, relative_link_text};
use crate::utils::permissions::{FilePermissions, copy_with_permissions};

/// How an entry is materialized from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Relative symlink to the source.
    #[default]
    Symlink,
    /// Byte-for-byte copy of the source.
    Copy,
    /// The source itself, relocated.
    Move,
}

impl PlacementMode {
    /// Picks the mode from the `--copy` and `--move` flags, falling back to `default`.
    #[must_use]
    pub const fn from_flags(copy: bool, move_: bool, default: Self) -> Self {
        if copy {
            Self::Copy
        } else if move_ {
            Self::Move
        } else {
            default
        }
    }

    /// Progress verb printed before the entry name.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Symlink => "Symlinking",
            Self::Copy => "Copying",
            Self::Move => "Moving",
        }
    }

    /// Word printed between the entry name and the source path.
    #[must_use]
    pub const fn joiner(self) -> &'static str {
        match self {
            Self::Symlink => "->",
            Self::Copy | Self::Move => "from",
        }
    }
}

/// What a successful placement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new entry was written.
    Installed,
    /// An equivalent entry was already there. For [`PlacementMode::Move`] the
    /// source has still been relocated over it.
    AlreadyInstalled,
}

/// A validated source executable and the entry it will become.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    /// The argument as given on the command line.
    pub arg: String,
    /// Entry name inside the managed directory.
    pub name: String,
    /// Absolute, lexically clean source path.
    pub source: PathBuf,
    /// `bin_dir/name`.
    pub destination: PathBuf,
    /// The managed directory.
    bin_dir: PathBuf,
    /// Source metadata, links followed.
    source_metadata: Metadata,
}

impl InstallPlan {
    /// Validates `arg` and derives the destination entry.
    ///
    /// Checks run in order and stop at the first failure: the source exists,
    /// is not a directory, does not start with `.`, and is executable.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, or [`InstallError::InvalidName`] for an
    /// unusable `rename`.
    pub fn prepare(
        bin_dir: &Path,
        arg: &str,
        strip_extension: bool,
        rename: Option<&str>,
    ) -> Result<Self, InstallError> {
        let source_metadata = match fs::metadata(arg) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(InstallError::NotFound),
            Err(e) => return Err(InstallError::io("reading metadata")(e)),
        };
        if source_metadata.is_dir() {
            return Err(InstallError::IsDirectory);
        }

        let source = make_absolute(Path::new(arg))?;
        let source_name = base_name(&source);
        if is_hidden_name(&source_name) {
            return Err(InstallError::Hidden);
        }
        if !FilePermissions::from_metadata(&source_metadata).is_executable() {
            return Err(InstallError::NotExecutable);
        }

        let name = match rename {
            Some(rename) => validate_name(rename)?,
            None if strip_extension => Path::new(&source_name)
                .file_stem()
                .map_or(source_name.clone(), |stem| stem.to_string_lossy().into_owned()),
            None => source_name,
        };

        Ok(Self {
            arg: arg.to_string(),
            destination: bin_dir.join(&name),
            name,
            source,
            bin_dir: bin_dir.to_path_buf(),
            source_metadata,
        })
    }

    /// Places the entry with `mode`. With `force` any existing destination is
    /// removed first.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Exists`] when a different entry occupies the
    /// destination, or the failing I/O step.
    pub fn place(&self, mode: PlacementMode, force: bool) -> Result<Outcome, InstallError> {
        let span = span!(Level::DEBUG, "place", name = %self.name, mode = ?mode, force);
        let _guard = span.enter();

        if force {
            match fs::remove_file(&self.destination) {
                Ok(()) => debug!("Removed existing destination"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(InstallError::io("removing existing program")(e)),
            }
        }

        match mode {
            PlacementMode::Symlink => self.symlink(),
            PlacementMode::Copy => self.copy(),
            PlacementMode::Move => self.relocate(),
        }
    }

    /// Link text a symlink install stores, relative to the managed directory.
    #[must_use]
    pub fn link_text(&self) -> PathBuf {
        relative_link_text(&self.bin_dir, &self.source).unwrap_or_else(|| self.source.clone())
    }

    fn symlink(&self) -> Result<Outcome, InstallError> {
        let link_text = self.link_text();
        match create_symlink(&link_text, &self.destination) {
            Ok(()) => {
                debug!(link = %link_text.display(), "Created symlink");
                return Ok(Outcome::Installed);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(InstallError::io("creating symlink")(e)),
        }

        let existing = fs::symlink_metadata(&self.destination)
            .map_err(InstallError::io("reading existing program"))?;
        if existing.file_type().is_symlink() {
            let stored = fs::read_link(&self.destination)
                .map_err(InstallError::io("reading existing link"))?;
            if stored == link_text {
                return Ok(Outcome::AlreadyInstalled);
            }
        }
        Err(self.exists())
    }

    fn copy(&self) -> Result<Outcome, InstallError> {
        match fs::symlink_metadata(&self.destination) {
            Ok(existing) => {
                if self.same_content(&existing)? {
                    Ok(Outcome::AlreadyInstalled)
                } else {
                    Err(self.exists())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                copy_with_permissions(&self.source, &self.destination)?;
                debug!("Copied file");
                Ok(Outcome::Installed)
            }
            Err(e) => Err(InstallError::io("reading existing program")(e)),
        }
    }

    fn relocate(&self) -> Result<Outcome, InstallError> {
        let source_link = fs::symlink_metadata(&self.source)
            .map_err(InstallError::io("reading source metadata"))?;
        if source_link.file_type().is_symlink() {
            return Err(InstallError::SymlinkMove);
        }

        let outcome = match fs::symlink_metadata(&self.destination) {
            Ok(existing) => {
                if !self.same_content(&existing)? {
                    return Err(self.exists());
                }
                // Identical content still gets moved so the source path is consumed.
                Outcome::AlreadyInstalled
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Outcome::Installed,
            Err(e) => return Err(InstallError::io("reading existing program")(e)),
        };

        match fs::rename(&self.source, &self.destination) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                debug!("Source is on another filesystem, copying instead");
                copy_with_permissions(&self.source, &self.destination)?;
                fs::remove_file(&self.source).map_err(InstallError::io("removing moved file"))?;
            }
            Err(e) => return Err(InstallError::io("moving file")(e)),
        }
        Ok(outcome)
    }

    /// Size, mode and bytes of `existing` (not following links) equal the source's.
    fn same_content(&self, existing: &Metadata) -> Result<bool, InstallError> {
        if existing.len() != self.source_metadata.len() {
            return Ok(false);
        }
        let source_mode = FilePermissions::from_metadata(&self.source_metadata);
        if FilePermissions::from_metadata(existing) != source_mode {
            return Ok(false);
        }
        same_bytes(&self.destination, &self.source).map_err(InstallError::io("comparing files"))
    }

    fn exists(&self) -> InstallError {
        InstallError::Exists {
            name: self.name.clone(),
        }
    }
}

fn validate_name(name: &str) -> Result<String, InstallError> {
    let reason = if name.is_empty() {
        "empty"
    } else if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
        "contains a path separator"
    } else if is_hidden_name(name) {
        "starts with '.'"
    } else {
        return Ok(name.to_string());
    };
    Err(InstallError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Whole-file byte comparison.
fn same_bytes(a: &Path, b: &Path) -> io::Result<bool> {
    let mut a = BufReader::new(File::open(a)?);
    let mut b = BufReader::new(File::open(b)?);
    loop {
        let chunk_a = a.fill_buf()?;
        let chunk_b = b.fill_buf()?;
        if chunk_a.is_empty() || chunk_b.is_empty() {
            return Ok(chunk_a.is_empty() && chunk_b.is_empty());
        }
        let n = chunk_a.len().min(chunk_b.len());
        if chunk_a[..n] != chunk_b[..n] {
            return Ok(false);
        }
        a.consume(n);
        b.consume(n);
    }
}

#[cfg(unix)]
fn create_symlink(link_text: &Path, destination: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link_text, destination)
}

#[cfg(windows)]
fn create_symlink(link_text: &Path, destination: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(link_text, destination)
}
