//! Configuration system for plistquill.
//!
//! Settings live in `~/.config/plistquill/config.toml`. Every field has a
//! default, so a partial (or missing) file is fine.
//!
//! # Example
//!
//! ```
//! use plistquill::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.indent_size, 4);
//! assert!(config.echo_instructions);
//!
//! let custom = Config {
//!     create_backup: true,
//!     ..Config::default()
//! };
//! assert!(custom.create_backup);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::file::format::Format;

/// Configuration for the plistquill tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per indentation level in XML property list and JSON output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Create .bak files before overwriting an output file
    #[serde(default)]
    pub create_backup: bool,

    /// Log each instruction at INFO before it runs
    #[serde(default = "default_echo_instructions")]
    pub echo_instructions: bool,

    /// Output format used when neither `--format` nor the output name decides
    #[serde(default)]
    pub default_format: Option<String>,
}

fn default_indent_size() -> usize {
    4
}

fn default_echo_instructions() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            create_backup: false,
            echo_instructions: default_echo_instructions(),
            default_format: None,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/plistquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("plistquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config");
                Self::default()
            }
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Parses `default_format`, if one is set.
    pub fn output_format(&self) -> anyhow::Result<Option<Format>> {
        self.default_format
            .as_deref()
            .map(str::parse::<Format>)
            .transpose()
    }
}
