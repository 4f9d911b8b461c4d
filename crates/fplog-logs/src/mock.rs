//! Test doubles for writers and sinks

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

use crate::adapter::LineSink;

/// In-memory writer whose contents can be inspected after the logger owns a clone
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that rejects every write
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock failure"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that records every accepted line
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LineSink for RecordingSink {
    fn accept_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Sink that panics, standing in for a broken downstream writer
pub struct PanickingSink;

impl LineSink for PanickingSink {
    fn accept_line(&self, _line: &str) {
        panic!("sink exploded");
    }
}
