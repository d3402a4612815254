use std::io;
use thiserror::Error;

/// Why a single program could not be installed.
///
/// Messages are meant to follow the offending argument, as in
/// `./tool: not an executable`.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The source path does not exist.
    #[error("file not found")]
    NotFound,

    /// The source path is a directory.
    #[error("is a directory")]
    IsDirectory,

    /// The source base name starts with a dot.
    #[error("program must not start with '.'")]
    Hidden,

    /// The source has no execute bit set.
    #[error("not an executable")]
    NotExecutable,

    /// The requested `--rename` value cannot be used as an entry name.
    #[error("{name:?}: invalid name ({reason})")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Something different already occupies the destination.
    #[error("{name} exists (overwrite with --force)")]
    Exists {
        /// Entry name in the managed directory.
        name: String,
    },

    /// Moving a symlink into the managed directory is refused.
    #[error("cannot install symlinks with --move")]
    SymlinkMove,

    /// An I/O step failed.
    #[error("{action}: {source}")]
    Io {
        /// The step that failed.
        action: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Any other failure, already carrying its own context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstallError {
    /// Wraps an I/O error with the step that produced it.
    pub(crate) fn io(action: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { action, source }
    }
}
