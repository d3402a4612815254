use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::install::PlacementMode;

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Managed directory; `XDG_BIN_HOME` takes precedence
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
}

/// Defaults for `install`, overridden by its flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallConfig {
    #[serde(default)]
    pub mode: PlacementMode,
    #[serde(default)]
    pub no_ext: bool,
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults and is not created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or unknown keys
    /// - `core.bin_dir` is not an absolute path
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Check values that TOML alone cannot constrain
    ///
    /// # Errors
    ///
    /// Returns an error if `core.bin_dir` is relative.
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.core.bin_dir
            && !dir.is_absolute()
        {
            bail!("{}: core.bin_dir should be absolute", dir.display());
        }
        Ok(())
    }
}
