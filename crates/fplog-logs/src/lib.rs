//! fplog Logs - Timestamped log writer with size-based rotation
//!
//! The [`Logger`] owns the active log file and serializes every write and
//! rotation behind one lock. Lines are `[<timestamp>]<message>\n`; once the
//! active file grows past the configured size it is moved into a bounded pool
//! of `<base>-<n>.log` backups.

pub mod adapter;
mod clock;
#[cfg(test)]
pub mod mock;
mod reader;
pub mod rotation;
mod state;
mod writer;

pub use adapter::{DiagnosticAdapter, LineSink};
pub use clock::{Clock, FixedClock, LocalClock};
pub use reader::LogReader;
pub use rotation::RotationConfig;
pub use state::LogState;
pub use writer::{render_line, Logger, LoggerBuilder, RenderedLine, Target, WriteOutcome};

use once_cell::sync::Lazy;

static GLOBAL: Lazy<Logger> = Lazy::new(Logger::new);

/// Process-wide logger for hosts that can only register a plain callback.
/// Starts unconfigured, writing to standard output until [`Logger::open`] is called.
pub fn global() -> &'static Logger {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // The only test touching the shared instance
    #[test]
    fn test_global_logger_behind_adapter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("global.log");

        global().open(path.to_str().unwrap(), "w").unwrap();
        let adapter = DiagnosticAdapter::new(global());
        adapter.on_diagnostic(&(), 2, "device attached");
        global().close();

        assert!(std::ptr::eq(global(), global()));
        assert_eq!(global().path(), None);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with("]device attached\n"));
    }
}
