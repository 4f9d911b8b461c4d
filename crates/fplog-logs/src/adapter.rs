//! Forwarding shim for diagnostic callbacks from an external library
//!
//! Device libraries typically expose a hook shaped like
//! `(context, level, text)`. [`DiagnosticAdapter`] fits that shape and passes
//! the text, unchanged, to anything that accepts lines.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

use crate::writer::Logger;

/// Something that accepts one line of pre-formatted text
pub trait LineSink: Send + Sync {
    fn accept_line(&self, line: &str);
}

impl LineSink for Logger {
    /// Writes the line as-is; severity filtering is the caller's business
    fn accept_line(&self, line: &str) {
        if let Err(e) = self.write_line(line) {
            warn!("Failed to write diagnostic line: {}", e);
        }
    }
}

impl<T: LineSink + ?Sized> LineSink for &T {
    fn accept_line(&self, line: &str) {
        (**self).accept_line(line)
    }
}

impl<T: LineSink + ?Sized> LineSink for Arc<T> {
    fn accept_line(&self, line: &str) {
        (**self).accept_line(line)
    }
}

/// Callback-shaped entry point that forwards diagnostic text to a [`LineSink`]
pub struct DiagnosticAdapter<S> {
    sink: S,
}

impl<S: LineSink> DiagnosticAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle one diagnostic message. `context` and `severity` are ignored:
    /// the library has already filtered by its own level.
    ///
    /// Never panics; a panic in the sink is caught and reported.
    pub fn on_diagnostic<C: ?Sized>(&self, _context: &C, _severity: i32, text: &str) {
        let forwarded = panic::catch_unwind(AssertUnwindSafe(|| self.sink.accept_line(text)));
        if forwarded.is_err() {
            warn!("Diagnostic sink panicked; message dropped");
        }
    }

    /// Wrap the adapter as a plain closure for registration APIs that take one
    pub fn into_callback(self) -> impl Fn(i32, &str) + Send + Sync
    where
        S: 'static,
    {
        move |severity: i32, text: &str| self.on_diagnostic(&(), severity, text)
    }
}
