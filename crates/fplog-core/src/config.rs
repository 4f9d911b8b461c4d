//! Settings file parsing for fplog
//!
//! Supports multiple settings file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{OpenMode, Severity};

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Logger settings as read from a settings file or assembled from flags.
/// Every field is optional; unset fields fall back to the defaults in [`crate::constants`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Log file location; unset means standard output
    pub path: Option<String>,
    /// fopen-style open mode ("a", "w", ...)
    pub mode: Option<String>,
    /// Minimum severity that reaches the writer
    pub level: Option<Severity>,
    /// Size in bytes above which the active file is rotated
    pub max_size_bytes: Option<u64>,
    /// Number of rotated backups kept
    pub pool_size: Option<usize>,
}

impl LogSettings {
    /// Load settings from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported settings file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse settings content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let settings: LogSettings = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Find and load a settings file from a directory
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let settings = Self::load(&path)?;
                return Ok((settings, path));
            }
        }
        Err(Error::ConfigError(format!(
            "No settings file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }

    /// Check value ranges without touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.len() > MAX_PATH_BYTES {
                return Err(Error::config(format!(
                    "path is {} bytes, limit is {}",
                    path.len(),
                    MAX_PATH_BYTES
                )));
            }
        }
        if self.max_size_bytes == Some(0) {
            return Err(Error::config("max_size_bytes must be positive"));
        }
        self.open_mode()?;
        Ok(())
    }

    /// Overlay explicitly set fields from `other` on top of these settings
    pub fn merge(mut self, other: LogSettings) -> Self {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        if other.level.is_some() {
            self.level = other.level;
        }
        if other.max_size_bytes.is_some() {
            self.max_size_bytes = other.max_size_bytes;
        }
        if other.pool_size.is_some() {
            self.pool_size = other.pool_size;
        }
        self
    }

    pub fn open_mode(&self) -> Result<OpenMode> {
        match &self.mode {
            Some(mode) => mode.parse(),
            None => DEFAULT_MODE.parse(),
        }
    }

    pub fn level(&self) -> Severity {
        self.level.unwrap_or_default()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes.unwrap_or(DEFAULT_ROTATION_SIZE)
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size.unwrap_or(DEFAULT_ROTATION_POOL)
    }
}
