//! Active log target: path, open mode, level, rotation thresholds and file handle

use fplog_core::constants::MAX_PATH_BYTES;
use fplog_core::{Error, OpenMode, Result, Severity};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::rotation::RotationConfig;

/// Configuration and file handle behind a [`crate::Logger`].
///
/// An empty path means nothing is configured and output goes to standard
/// output. At most one handle is held; it is opened eagerly by [`LogState::open`],
/// dropped on rotation and reopened lazily by the next write.
#[derive(Debug)]
pub struct LogState {
    path: String,
    mode: OpenMode,
    stream: Option<File>,
    min_severity: i32,
    rotation: RotationConfig,
}

impl Default for LogState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogState {
    pub fn new() -> Self {
        Self {
            path: String::new(),
            mode: OpenMode::default(),
            stream: None,
            min_severity: Severity::default().level(),
            rotation: RotationConfig::default(),
        }
    }

    /// Validate and open `path` with an fopen-style `mode`, replacing the current target.
    ///
    /// Nothing changes unless the file opens. The previous handle, if any, is closed.
    pub fn open(&mut self, path: &str, mode: &str) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid("log path is empty"));
        }
        if path.len() > MAX_PATH_BYTES {
            return Err(Error::invalid(format!(
                "log path is {} bytes, limit is {}",
                path.len(),
                MAX_PATH_BYTES
            )));
        }
        let mode: OpenMode = mode.parse()?;
        let file = mode.options().open(path)?;

        self.path = path.to_string();
        self.mode = mode;
        self.stream = Some(file);
        Ok(())
    }

    /// Release the handle and forget the path. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.stream = None;
        self.path.clear();
        self.mode = OpenMode::default();
    }

    pub fn set_level(&mut self, level: i32) {
        self.min_severity = level;
    }

    pub fn level(&self) -> i32 {
        self.min_severity
    }

    pub fn set_rotation(&mut self, rotation: RotationConfig) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> &RotationConfig {
        &self.rotation
    }

    /// Configured path, empty when unconfigured
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn mode(&self) -> &OpenMode {
        &self.mode
    }

    pub fn is_configured(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Reopen the configured file if the handle was released.
    /// Does nothing when unconfigured or already open.
    pub(crate) fn ensure_open(&mut self) -> io::Result<()> {
        if self.stream.is_none() && self.is_configured() {
            self.stream = Some(self.mode.options().open(Path::new(&self.path))?);
        }
        Ok(())
    }

    /// Reopen the configured file for appending, whatever the configured mode.
    /// A file that could not be rotated away must keep its content.
    pub(crate) fn reopen_appending(&mut self) -> io::Result<()> {
        if self.is_configured() {
            self.stream = Some(OpenMode::append().options().open(Path::new(&self.path))?);
        }
        Ok(())
    }

    pub(crate) fn stream(&self) -> Option<&File> {
        self.stream.as_ref()
    }

    pub(crate) fn stream_mut(&mut self) -> Option<&mut File> {
        self.stream.as_mut()
    }

    /// Close the handle but keep the path so the next write reopens it
    pub(crate) fn release_stream(&mut self) {
        self.stream = None;
    }
}
