#![warn(missing_docs)]

//! # Binman - manager for your personal bin directory
//!
//! Binman owns one flat directory of programs, `$XDG_BIN_HOME` or
//! `~/.local/bin` by default. Programs are installed as relative symlinks,
//! copies, or moved files, and can later be listed, removed, pruned and
//! checked for consistency.
//!
//! ## Architecture
//!
//! - [`scanner`]: One-pass classification of the managed directory
//! - [`registry`]: Name, path and target indexes plus argument matching
//! - [`install`]: Conflict-aware placement of source executables
//! - [`prune`]: Detection of broken symlinks
//! - [`doctor`]: Structural consistency checks
//! - [`commands`]: Command implementations printing user-facing output
//! - [`config`]: Optional TOML configuration
//!
//! ## Example Usage
//!
//! ```no_run
//! use binman::BinmanContext;
//! use binman::registry::MatchMode;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = BinmanContext::new()?;
//! let registry = ctx.registry()?;
//! for m in registry.find("rg", MatchMode::Both)? {
//!     println!("{} -> {:?}", m.name, m.target);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations.
pub mod commands;

/// Configuration file parsing.
#[allow(missing_docs)]
pub mod config;

/// Structural checks over the managed directory.
pub mod doctor;

/// Placement of programs into the managed directory.
pub mod install;

/// Output formatting and styling.
pub mod output;

/// Broken symlink detection.
pub mod prune;

/// Bidirectional program index and argument matching.
pub mod registry;

/// Managed directory scanning.
pub mod scanner;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result, bail};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Current version of the binman binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable selecting the managed directory.
pub const BIN_DIR_ENV: &str = "XDG_BIN_HOME";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "BINMAN_CONFIG_PATH";

/// Default managed directory relative to the home directory.
pub const DEFAULT_BIN_DIR: &str = ".local/bin";

/// Default configuration file path relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/binman/config.toml";

/// Per-invocation settings shared by every command.
///
/// Built once at startup; commands never look at the environment themselves.
///
/// # Examples
///
/// ```no_run
/// use binman::BinmanContext;
/// use binman::config::Config;
///
/// # fn main() -> anyhow::Result<()> {
/// // Resolve from XDG_BIN_HOME, the config file, or ~/.local/bin
/// let ctx = BinmanContext::new()?;
///
/// // Explicit paths, as used in tests
/// let ctx = BinmanContext::new_explicit("/tmp/bin".into(), Config::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BinmanContext {
    /// The managed directory, absolute and lexically clean.
    pub bin_dir: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl BinmanContext {
    /// Creates a context from the environment and the configuration file.
    ///
    /// The managed directory is taken from `XDG_BIN_HOME`, then from
    /// `core.bin_dir` in the configuration, then `~/.local/bin`.
    ///
    /// # Errors
    /// Returns an error if the home directory is needed but unknown, if the
    /// configuration cannot be loaded, or if `XDG_BIN_HOME` is relative.
    pub fn new() -> Result<Self> {
        let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::home_dir()
                .context("Could not find home directory")?
                .join(DEFAULT_CONFIG_PATH),
        };
        let config = config::Config::load(&config_path)?;

        let bin_dir = match std::env::var_os(BIN_DIR_ENV) {
            Some(dir) if !dir.is_empty() => {
                let dir = PathBuf::from(dir);
                if !dir.is_absolute() {
                    bail!("{}: {BIN_DIR_ENV} should be absolute", dir.display());
                }
                dir
            }
            _ => match &config.core.bin_dir {
                Some(dir) => dir.clone(),
                None => dirs::home_dir()
                    .context("Could not find home directory")?
                    .join(DEFAULT_BIN_DIR),
            },
        };

        Self::new_explicit(bin_dir, config)
    }

    /// Creates a context with an explicit managed directory.
    ///
    /// # Errors
    /// Returns an error if `bin_dir` is not absolute.
    pub fn new_explicit(bin_dir: PathBuf, config: config::Config) -> Result<Self> {
        if !bin_dir.is_absolute() {
            bail!("{}: managed directory should be absolute", bin_dir.display());
        }
        Ok(Self {
            bin_dir: bin_dir.clean(),
            config,
        })
    }

    /// The managed directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Scans the managed directory and builds a fresh registry snapshot.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be listed or a symlink in it
    /// cannot be read.
    pub fn registry(&self) -> Result<registry::Registry> {
        let entries = scanner::scan(&self.bin_dir)?;
        Ok(registry::Registry::new(&self.bin_dir, entries))
    }
}
