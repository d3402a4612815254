#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment: a managed directory, a source directory, and a
/// config path that does not exist unless a test writes it.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub src_dir: PathBuf,
    pub config_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        // Canonical so printed paths compare equal on systems where /tmp is a symlink
        let root = fs::canonicalize(temp_dir.path())?;
        let bin_dir = root.join("bin");
        let src_dir = root.join("src");
        fs::create_dir_all(&src_dir)?;

        Ok(Self {
            config_path: root.join("config.toml"),
            temp_dir,
            root,
            bin_dir,
            src_dir,
        })
    }

    /// `binman` with the environment pointed at this fixture.
    pub fn cmd(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("binman")?;
        cmd.env("XDG_BIN_HOME", &self.bin_dir)
            .env("BINMAN_CONFIG_PATH", &self.config_path)
            .env("HOME", &self.root)
            .env_remove("RUST_LOG")
            .env_remove("NO_COLOR")
            .current_dir(&self.root);
        Ok(cmd)
    }

    /// Writes an executable script into the source directory.
    pub fn program(&self, name: &str) -> Result<PathBuf> {
        self.file(name, "#!/bin/sh\necho hi\n", 0o755)
    }

    /// Writes a file with the given contents and mode into the source directory.
    pub fn file(&self, name: &str, contents: &str, mode: u32) -> Result<PathBuf> {
        let path = self.src_dir.join(name);
        fs::write(&path, contents)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;
        Ok(path)
    }

    pub fn entry(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }

    /// Sorted names in the managed directory.
    pub fn entries(&self) -> Result<Vec<String>> {
        let mut names = fs::read_dir(&self.bin_dir)?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}
