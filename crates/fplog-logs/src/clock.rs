//! Timestamp sources for rendered lines

use chrono::Local;
use fplog_core::constants::TIMESTAMP_FORMAT;

/// Supplies the timestamp placed at the start of every line
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Always returns the same text. Useful when line lengths must be exact.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new<S: Into<String>>(stamp: S) -> Self {
        Self(stamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}
