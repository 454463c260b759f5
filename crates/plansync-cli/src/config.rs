//! Configuration loading.
//!
//! Settings come from a JSON file (`plansync.json` by default); command-line
//! flags and `PLANSYNC_*` environment variables override it.

use plansync_core::{CodecOptions, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "plansync.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Merge policy used when none is given on the command line
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Indent written documents
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// After a committed merge, also write the result as the new baseline
    #[serde(default = "default_true")]
    pub write_baseline: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            pretty: true,
            write_baseline: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, strategy: Option<StrategyKind>, compact: bool) -> Self {
        if let Some(strategy) = strategy {
            self.strategy = strategy;
        }
        if compact {
            self.pretty = false;
        }
        self
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            pretty: self.pretty,
        }
    }
}
