use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Unix permission bits of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePermissions {
    mode: u32,
}

impl FilePermissions {
    /// Create permissions from a raw mode value
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        Self { mode }
    }

    /// Read permissions from already fetched metadata
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Self::from_mode(metadata.mode())
        }

        #[cfg(not(unix))]
        {
            // Without execute bits everything that is not read-only counts as runnable
            let mode = if metadata.permissions().readonly() {
                0o555
            } else {
                0o755
            };
            Self::from_mode(mode)
        }
    }

    /// Read permissions from a file, following symlinks
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for: {}", path.display()))?;
        Ok(Self::from_metadata(&metadata))
    }

    /// Check if any of the owner, group or other execute bits is set
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        (self.mode & 0o111) != 0
    }

    /// Apply the permission bits to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be set
    pub fn apply_to_path(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(self.mode & 0o7777);
            fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions for: {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let _ = path;
        }

        Ok(())
    }
}

/// Returns true if `metadata` describes a file with any execute bit set
#[must_use]
pub fn is_executable(metadata: &fs::Metadata) -> bool {
    FilePermissions::from_metadata(metadata).is_executable()
}

/// Copy a file byte for byte and carry its permission bits over
///
/// # Errors
///
/// Returns an error if:
/// - Failed to copy the file
/// - Failed to apply the source permissions to the copy
pub fn copy_with_permissions(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;

    let permissions = FilePermissions::from_path(src)?;
    permissions.apply_to_path(dst)?;

    Ok(())
}
