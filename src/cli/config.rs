//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live
//! in a config file; command-line flags take precedence:
//!
//! ```toml
//! # peaklist.toml
//! [load]
//! catalog = "raw_files.json"
//! entry = "Aligned peak list.xml"
//! strict_array_length = true
//! reject_multiple_preferred = false
//! progress_interval = 500
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use peaklist::streamer::StreamerConfig;

/// Root configuration structure for peaklist.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Load-specific settings.
    #[serde(default)]
    pub load: LoadConfig,
}

/// Configuration for the load command.
#[derive(Debug, Default, Deserialize)]
pub struct LoadConfig {
    /// Raw data catalog (JSON) path.
    pub catalog: Option<PathBuf>,

    /// Archive entry to load.
    pub entry: Option<String>,

    /// Reject binary arrays longer than their declared count.
    pub strict_array_length: Option<bool>,

    /// Reject rows with more than one preferred identity.
    pub reject_multiple_preferred: Option<bool>,

    /// Rows between progress log lines.
    pub progress_interval: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl LoadConfig {
    /// Streamer settings, with `strict` forcing every check on
    pub fn streamer_config(&self, strict: bool) -> StreamerConfig {
        let defaults = StreamerConfig::default();
        StreamerConfig {
            strict_array_length: strict
                || self
                    .strict_array_length
                    .unwrap_or(defaults.strict_array_length),
            reject_multiple_preferred: strict
                || self
                    .reject_multiple_preferred
                    .unwrap_or(defaults.reject_multiple_preferred),
            progress_interval: self
                .progress_interval
                .unwrap_or(defaults.progress_interval),
        }
    }
}
