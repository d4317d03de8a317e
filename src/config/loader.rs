//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use crate::fs::DEFAULT_FALLBACK_TOKEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "photo-dedupe.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source and output directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory tree to walk.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Flat directory receiving first-seen files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Dedup store location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot of the dedup index.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Output naming options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix used when a file has no usable capture time.
    #[serde(default = "default_fallback_token")]
    pub fallback_token: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            fallback_token: default_fallback_token(),
        }
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write log lines to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("originals")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("photo-dedupe.db")
}

fn default_fallback_token() -> String {
    DEFAULT_FALLBACK_TOKEN.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
