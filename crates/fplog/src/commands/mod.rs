//! Command implementations

pub mod backups;
pub mod rotate;
pub mod tail;
pub mod write;

use anyhow::{anyhow, Result};
use fplog_core::constants::CONFIG_FILES;
use fplog_core::LogSettings;
use std::path::Path;
use tracing::debug;

use crate::cli::TargetArgs;

/// Resolve settings: the given settings file, else one found in the current
/// directory, else defaults; then apply command-line flags.
pub fn load_settings(args: &TargetArgs) -> Result<LogSettings> {
    let base = match &args.config {
        Some(path) => LogSettings::load(path)?,
        None => discover(&std::env::current_dir()?)?,
    };

    let settings = base.merge(args.overrides());
    settings.validate()?;
    debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

fn discover(dir: &Path) -> Result<LogSettings> {
    if CONFIG_FILES.iter().any(|name| dir.join(name).exists()) {
        let (settings, path) = LogSettings::find_and_load(dir)?;
        debug!("Loaded settings from {}", path.display());
        return Ok(settings);
    }
    Ok(LogSettings::default())
}

/// The configured log path, required by commands that inspect files
pub fn require_path(settings: &LogSettings) -> Result<String> {
    settings
        .path
        .clone()
        .ok_or_else(|| anyhow!("No log file configured; pass --file or set `path` in fplog.toml"))
}
