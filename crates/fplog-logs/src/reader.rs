//! Log reader for tail and follow operations across the backup pool

use fplog_core::{constants, Error, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::rotation;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Reads an active log file and, optionally, its rotated backups
pub struct LogReader {
    path: PathBuf,
    pool_size: usize,
}

impl LogReader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pool_size: constants::DEFAULT_ROTATION_POOL,
        }
    }

    /// Number of backup slots to look at
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Read the last N lines from the active file
    pub fn tail(&self, n: usize) -> Result<Vec<String>> {
        let mut lines = VecDeque::with_capacity(n + 1);
        push_lines(&self.path, n, &mut lines)?;
        Ok(lines.into_iter().collect())
    }

    /// Read the last N lines across the backups and the active file, oldest first
    pub fn tail_all(&self, n: usize) -> Result<Vec<String>> {
        let mut lines = VecDeque::with_capacity(n + 1);
        for path in self.files() {
            push_lines(&path, n, &mut lines)?;
        }
        Ok(lines.into_iter().collect())
    }

    /// Existing backups from oldest to newest
    pub fn backups(&self) -> Vec<PathBuf> {
        let mut backups = rotation::existing_backups(&self.path_str(), self.pool_size);
        backups.reverse();
        backups
    }

    /// Existing backups followed by the active file, oldest first
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = self.backups();
        if self.path.exists() {
            files.push(self.path.clone());
        }
        files
    }

    /// Follow the active file (like tail -F).
    /// New lines are delivered as they are written; rotation restarts at the new file.
    pub fn follow(&self) -> Result<mpsc::Receiver<String>> {
        let path = self.path.clone();
        let (tx, rx) = mpsc::channel(100);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = follow_file(&path, tx) {
                debug!("Follow ended: {}", e);
            }
        });

        Ok(rx)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the active file, 0 if it does not exist
    pub fn size(&self) -> Result<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Append the lines of `path` to `lines`, keeping only the last `n`
fn push_lines(path: &Path, n: usize, lines: &mut VecDeque<String>) -> Result<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for line_result in BufReader::new(file).lines() {
        lines.push_back(line_result?);
        if lines.len() > n {
            lines.pop_front();
        }
    }
    Ok(())
}

/// Read complete lines appended past `position`, advancing it.
///
/// A file shorter than `position` has been rotated or truncated, so reading
/// starts again from the beginning. A trailing partial line is left for the
/// next call.
fn read_appended(path: &Path, position: &mut u64) -> Result<Vec<String>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };

    let len = file.metadata()?.len();
    if len < *position {
        *position = 0;
    }
    if len == *position {
        return Ok(vec![]);
    }

    file.seek(SeekFrom::Start(*position))?;
    let mut buffer = Vec::new();
    file.take(len - *position).read_to_end(&mut buffer)?;

    let Some(last_newline) = buffer.iter().rposition(|&b| b == b'\n') else {
        return Ok(vec![]);
    };
    *position += last_newline as u64 + 1;

    Ok(String::from_utf8_lossy(&buffer[..last_newline])
        .lines()
        .map(str::to_string)
        .collect())
}

fn follow_file(path: &Path, tx: mpsc::Sender<String>) -> Result<()> {
    use notify::{RecommendedWatcher, RecursiveMode, Watcher};

    let mut position = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    // The directory is watched, not the file, so renames during rotation are seen
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let (watch_tx, watch_rx) = std_mpsc::channel();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = watch_tx.send(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut watcher| {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    });

    // Without a watcher the timeout below still polls the file
    let watcher = match watcher {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            debug!("File watcher unavailable, polling instead: {}", e);
            None
        }
    };

    loop {
        match watch_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(_event)) => {}
            Ok(Err(e)) => debug!("Watch error: {}", e),
            Err(std_mpsc::RecvTimeoutError::Timeout) => {}
            Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                if watcher.is_some() {
                    break;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }

        if tx.is_closed() {
            return Ok(());
        }

        for line in read_appended(path, &mut position)? {
            if tx.blocking_send(line).is_err() {
                return Ok(());
            }
        }
    }

    Err(Error::config("file watcher stopped"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_lines(path: &Path, range: std::ops::RangeInclusive<usize>) {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        for i in range {
            writeln!(file, "Line {}", i).unwrap();
        }
    }

    #[test]
    fn test_tail_nonexistent_file() {
        let reader = LogReader::new(PathBuf::from("/nonexistent/file.log"));
        assert!(reader.tail(10).unwrap().is_empty());
        assert!(reader.tail_all(10).unwrap().is_empty());
        assert_eq!(reader.size().unwrap(), 0);
    }

    #[test]
    fn test_tail_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        write_lines(&path, 1..=20);

        let lines = LogReader::new(path).tail(5).unwrap();
        assert_eq!(lines, vec!["Line 16", "Line 17", "Line 18", "Line 19", "Line 20"]);
    }

    #[test]
    fn test_tail_all_spans_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        write_lines(&dir.path().join("app-2.log"), 1..=3);
        write_lines(&dir.path().join("app-1.log"), 4..=6);
        write_lines(&path, 7..=8);

        let reader = LogReader::new(path.clone()).with_pool_size(2);
        assert_eq!(
            reader.files(),
            vec![
                dir.path().join("app-2.log"),
                dir.path().join("app-1.log"),
                path.clone()
            ]
        );
        assert_eq!(
            reader.tail_all(4).unwrap(),
            vec!["Line 5", "Line 6", "Line 7", "Line 8"]
        );
        assert_eq!(reader.tail_all(100).unwrap().len(), 8);

        // Slots beyond the pool are not read
        let narrow = LogReader::new(path).with_pool_size(1);
        assert_eq!(narrow.tail_all(100).unwrap().len(), 5);
    }

    #[test]
    fn test_read_appended_keeps_partial_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "one\ntwo\nthr").unwrap();

        let mut position = 0;
        assert_eq!(read_appended(&path, &mut position).unwrap(), vec!["one", "two"]);
        assert_eq!(position, 8);

        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"ee\n").unwrap();
        assert_eq!(read_appended(&path, &mut position).unwrap(), vec!["three"]);
        assert!(read_appended(&path, &mut position).unwrap().is_empty());
    }

    #[test]
    fn test_read_appended_restarts_after_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "a fairly long first line\n").unwrap();

        let mut position = 0;
        read_appended(&path, &mut position).unwrap();

        fs::rename(&path, dir.path().join("app-1.log")).unwrap();
        assert!(read_appended(&path, &mut position).unwrap().is_empty());

        fs::write(&path, "fresh\n").unwrap();
        assert_eq!(read_appended(&path, &mut position).unwrap(), vec!["fresh"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_follow_delivers_new_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        write_lines(&path, 1..=2);

        let mut rx = LogReader::new(path.clone()).follow().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        write_lines(&path, 3..=3);

        let line = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(line.as_deref(), Some("Line 3"));
    }
}
