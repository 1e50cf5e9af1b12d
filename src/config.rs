//! armm configuration file handling
//!
//! Loads the optional ~/.config/armm/config.yaml. Every field has a default,
//! so a missing file simply means default settings.

use crate::manifest::{DEFAULT_FILENAME, DEFAULT_INDENT};
use crate::{ArmmError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per result
    #[default]
    Plain,
    /// JSON array
    Json,
    /// YAML sequence
    Yaml,
}

/// armm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmmConfig {
    /// Manifest file edited when none is given on the command line
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Output format for `list`
    #[serde(default)]
    pub format: OutputFormat,

    /// Indentation width of saved manifests
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_manifest() -> PathBuf {
    PathBuf::from(DEFAULT_FILENAME)
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl ArmmConfig {
    pub fn new() -> Self {
        Self {
            manifest: default_manifest(),
            format: OutputFormat::default(),
            indent: default_indent(),
        }
    }

    /// Load from the default path, falling back to defaults when absent
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::new());
        }
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ArmmError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading armm configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        if config.indent > 16 {
            return Err(ArmmError::Config(format!(
                "indent must be at most 16, got {}",
                config.indent
            )));
        }

        tracing::debug!(
            manifest = %config.manifest.display(),
            format = ?config.format,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Get the default config path (~/.config/armm/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("armm");
        path.push("config.yaml");
        path
    }
}

impl Default for ArmmConfig {
    fn default() -> Self {
        Self::new()
    }
}
