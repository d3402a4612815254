use anyhow::{Context, Result};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Makes a path absolute, resolving relative paths from the current directory.
///
/// The result is lexically cleaned, so `./a/../b` becomes `$PWD/b`.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn make_absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        let current_dir =
            std::env::current_dir().context("Could not determine the current directory")?;
        Ok(current_dir.join(path).clean())
    }
}

/// Resolves the text of a symlink stored in `base` to an absolute path.
///
/// Absolute link text is returned cleaned; relative link text is joined onto
/// `base` first. No filesystem access happens here.
#[must_use]
pub fn resolve_link_text(base: &Path, link_text: &Path) -> PathBuf {
    if link_text.is_absolute() {
        link_text.clean()
    } else {
        base.join(link_text).clean()
    }
}

/// Computes the link text that makes a symlink in `dir` point at `target`.
///
/// Both paths must be absolute. Returns `None` when no relative path exists.
#[must_use]
pub fn relative_link_text(dir: &Path, target: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(target.clean(), dir.clean())
}

/// Returns true for names hidden by the leading-dot convention.
#[must_use]
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Base file name of `path` as a string, lossily converted.
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_make_absolute() {
        let absolute = PathBuf::from("/absolute/path");
        let result = make_absolute(&absolute).unwrap();
        assert_eq!(result, absolute);

        let relative = PathBuf::from("relative/path");
        let result = make_absolute(&relative).unwrap();
        assert!(result.is_absolute());
        assert!(result.ends_with("relative/path"));
    }

    #[test]
    fn test_make_absolute_cleans_dots() {
        let result = make_absolute(Path::new("/usr/local/../bin/./foo")).unwrap();
        assert_eq!(result, PathBuf::from("/usr/bin/foo"));
    }

    #[test]
    #[serial]
    fn test_make_absolute_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let result = make_absolute(Path::new("foo")).unwrap();
        assert_eq!(result, cwd.join("foo"));
    }

    #[test]
    fn test_resolve_link_text() {
        let base = Path::new("/home/user/.local/bin");
        assert_eq!(
            resolve_link_text(base, Path::new("../../src/tool/run.sh")),
            PathBuf::from("/home/user/src/tool/run.sh")
        );
        assert_eq!(
            resolve_link_text(base, Path::new("/usr/bin//foo")),
            PathBuf::from("/usr/bin/foo")
        );
    }

    #[test]
    fn test_relative_link_text() {
        let dir = Path::new("/home/user/.local/bin");
        let rel = relative_link_text(dir, Path::new("/usr/bin/foo")).unwrap();
        assert_eq!(rel, PathBuf::from("../../../../usr/bin/foo"));
        assert_eq!(resolve_link_text(dir, &rel), PathBuf::from("/usr/bin/foo"));
    }

    #[test]
    fn test_hidden_and_base_name() {
        assert!(is_hidden_name(".profile"));
        assert!(!is_hidden_name("profile"));
        assert_eq!(base_name(Path::new("/usr/bin/foo")), "foo");
        assert_eq!(base_name(Path::new("/")), "");
    }
}
