//! Core types for fplog

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::constants::MAX_MODE_BYTES;
use crate::error::{Error, Result};

/// Message severity, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace = 0,
    #[default]
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Numeric level compared against a logger's threshold
    pub fn level(&self) -> i32 {
        *self as i32
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(Error::invalid(format!("unknown severity: {}", s))),
        }
    }
}

/// How the active log file is opened, parsed from an fopen-style descriptor
/// such as `"a"`, `"ab"`, `"a+"`, `"w"` or `"w+"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMode {
    descriptor: String,
    truncate: bool,
    read: bool,
    /// `x`: fail instead of opening a file that already exists
    exclusive: bool,
}

impl OpenMode {
    /// Append to an existing file, creating it if missing
    pub fn append() -> Self {
        Self {
            descriptor: "a".to_string(),
            truncate: false,
            read: false,
            exclusive: false,
        }
    }

    /// Truncate the file on every open
    pub fn truncate() -> Self {
        Self {
            descriptor: "w".to_string(),
            truncate: true,
            read: false,
            exclusive: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.descriptor
    }

    pub fn is_truncate(&self) -> bool {
        self.truncate
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// File-open options matching this descriptor
    pub fn options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.read);
        if self.exclusive {
            options.create_new(true);
        } else {
            options.create(true);
        }
        if self.truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        options
    }
}

impl Default for OpenMode {
    fn default() -> Self {
        Self::append()
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor)
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > MAX_MODE_BYTES {
            return Err(Error::invalid(format!(
                "open mode must be 1..={} bytes: {:?}",
                MAX_MODE_BYTES, s
            )));
        }

        let mut chars = s.chars();
        let truncate = match chars.next() {
            Some('a') => false,
            Some('w') => true,
            _ => return Err(Error::invalid(format!("unsupported open mode: {:?}", s))),
        };

        let mut read = false;
        let mut exclusive = false;
        for c in chars {
            match c {
                '+' => read = true,
                'x' => exclusive = true,
                // Binary/text flags and platform extras have no effect on Unix-style files
                'b' | 't' | 'c' | 'n' => {}
                _ => return Err(Error::invalid(format!("unsupported open mode: {:?}", s))),
            }
        }

        Ok(Self {
            descriptor: s.to_string(),
            truncate,
            read,
            exclusive,
        })
    }
}
