//! Configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Also append log events to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Fail on malformed connection lines and unregistered endpoints
    /// instead of skipping them
    #[serde(default)]
    pub strict_connections: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Separator printed between devices of a route
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
        }
    }
}

fn default_separator() -> String {
    " <-> ".to_string()
}

/// Load configuration from file, falling back to defaults when it is absent.
///
/// Returns whether the file was found so the caller can report it once
/// logging is up.
pub fn load_config(path: &Path) -> Result<(Config, bool)> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((Config::default(), false))
    }
}
