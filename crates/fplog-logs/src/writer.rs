//! Log writer with rotation support

use fplog_core::constants::{LINE_CAPACITY, MAX_TIMESTAMP_BYTES};
use fplog_core::{LogSettings, Result, Severity};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::warn;

use crate::clock::{Clock, LocalClock};
use crate::rotation::{self, RotationConfig};
use crate::state::LogState;

/// Where a line ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    File,
    Stdout,
}

/// Result of a single write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub target: Target,
    /// Bytes written, including any appended newline
    pub bytes: usize,
    /// The message did not fit in a line and was cut short
    pub truncated: bool,
    /// The write pushed the file over its threshold and it was rotated
    pub rotated: bool,
}

/// A line ready to be written, without its trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub truncated: bool,
}

/// Render `[<timestamp>]<message>` within [`LINE_CAPACITY`].
///
/// The content is limited to `LINE_CAPACITY - 1` bytes, cut on a character
/// boundary, which leaves room for the newline the writer may append.
pub fn render_line(timestamp: &str, message: &str) -> RenderedLine {
    let timestamp = clip(timestamp, MAX_TIMESTAMP_BYTES);

    let mut text = String::with_capacity(LINE_CAPACITY);
    text.push('[');
    text.push_str(timestamp);
    text.push(']');

    let room = LINE_CAPACITY - 1 - text.len();
    let body = clip(message, room);
    text.push_str(body);

    RenderedLine {
        text,
        truncated: body.len() < message.len(),
    }
}

fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Write the line, add a newline if it lacks one, and flush
fn emit(out: &mut dyn Write, line: &str) -> io::Result<usize> {
    let mut bytes = line.len();
    out.write_all(line.as_bytes())?;
    if !line.ends_with('\n') {
        out.write_all(b"\n")?;
        bytes += 1;
    }
    out.flush()?;
    Ok(bytes)
}

struct Inner {
    state: LogState,
    clock: Arc<dyn Clock>,
    fallback: Box<dyn Write + Send>,
}

/// Timestamped line writer over a rotating log file.
///
/// Every operation takes the same lock, so a write and the rotation check that
/// follows it happen as one step even when the logger is shared across threads.
pub struct Logger {
    inner: Mutex<Inner>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Logger").field("state", &inner.state).finish()
    }
}

impl Logger {
    /// Unconfigured logger writing to standard output with default rotation
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Build a logger from settings, opening the file when a path is set
    pub fn from_settings(settings: &LogSettings) -> Result<Self> {
        settings.validate()?;
        let logger = Self::builder()
            .rotation(RotationConfig::from(settings))
            .level(settings.level().level())
            .build();

        if let Some(path) = &settings.path {
            logger.open(path, settings.open_mode()?.as_str())?;
        }
        Ok(logger)
    }

    /// Open `path` with an fopen-style `mode` ("a", "w", ...) as the log target
    pub fn open(&self, path: &str, mode: &str) -> Result<()> {
        self.inner.lock().state.open(path, mode)
    }

    /// Close the log file and return to writing on standard output
    pub fn close(&self) {
        self.inner.lock().state.close();
    }

    pub fn set_level(&self, level: i32) {
        self.inner.lock().state.set_level(level);
    }

    pub fn level(&self) -> i32 {
        self.inner.lock().state.level()
    }

    pub fn set_rotation(&self, rotation: RotationConfig) {
        self.inner.lock().state.set_rotation(rotation);
    }

    pub fn rotation(&self) -> RotationConfig {
        self.inner.lock().state.rotation().clone()
    }

    /// Configured path, if any
    pub fn path(&self) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .state
            .is_configured()
            .then(|| inner.state.path().to_string())
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().state.is_open()
    }

    /// Whether a message of this severity passes the threshold
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.level() >= self.level()
    }

    /// Write a message if `severity` passes the threshold.
    /// Returns `None` when the message was suppressed.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<Option<WriteOutcome>> {
        if !self.enabled(severity) {
            return Ok(None);
        }
        self.write(args).map(Some)
    }

    /// Format and write one line. The caller has already applied severity filtering.
    ///
    /// Falls back to standard output for this call if the file cannot be
    /// reopened. Only failures of the write itself are returned; the failed
    /// reopen is reported as a `tracing` warning, which reaches standard error
    /// only once the application installs a subscriber writing there (e.g.
    /// `tracing_subscriber::fmt().with_writer(std::io::stderr)`).
    pub fn write(&self, args: fmt::Arguments<'_>) -> Result<WriteOutcome> {
        match args.as_str() {
            Some(s) => self.write_line(s),
            None => self.write_line(&fmt::format(args)),
        }
    }

    /// Write a pre-formatted message. Same fallback and diagnostics as [`Logger::write`].
    pub fn write_line(&self, message: &str) -> Result<WriteOutcome> {
        let mut guard = self.inner.lock();
        let Inner {
            state,
            clock,
            fallback,
        } = &mut *guard;

        if let Err(e) = state.ensure_open() {
            warn!(
                "Failed to open log file {}, writing to stdout: {}",
                state.path(),
                e
            );
        }

        let line = render_line(&clock.now(), message);

        let (target, bytes) = match state.stream_mut() {
            Some(file) => (Target::File, emit(file, &line.text)?),
            None => (Target::Stdout, emit(fallback.as_mut(), &line.text)?),
        };

        let rotated = target == Target::File && rotation::maybe_rotate(state);

        Ok(WriteOutcome {
            target,
            bytes,
            truncated: line.truncated,
            rotated,
        })
    }

    /// Run the rotation check outside of a write
    pub fn maybe_rotate(&self) -> bool {
        rotation::maybe_rotate(&mut self.inner.lock().state)
    }

    /// Rotate the configured file now, whatever its size.
    /// Returns false when nothing is configured or the file could not be moved aside.
    pub fn rotate_now(&self) -> bool {
        rotation::rotate(&mut self.inner.lock().state)
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    state: LogState,
    clock: Arc<dyn Clock>,
    fallback: Box<dyn Write + Send>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            state: LogState::new(),
            clock: Arc::new(LocalClock),
            fallback: Box::new(io::stdout()),
        }
    }
}

impl LoggerBuilder {
    pub fn rotation(mut self, rotation: RotationConfig) -> Self {
        self.state.set_rotation(rotation);
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.state.set_level(level);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace standard output as the target used when no file is open
    pub fn fallback<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.fallback = Box::new(out);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            inner: Mutex::new(Inner {
                state: self.state,
                clock: self.clock,
                fallback: self.fallback,
            }),
        }
    }
}
