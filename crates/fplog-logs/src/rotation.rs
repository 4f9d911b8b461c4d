//! Size-based rotation into a bounded pool of numbered backups
//!
//! Backups are named `<base>-<n>.log` where `base` is the active path without
//! its extension. Index 1 is the newest backup and `pool_size` the oldest.

use fplog_core::constants::{self, BACKUP_EXTENSION};
use fplog_core::LogSettings;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, warn};

use crate::state::LogState;

/// Log rotation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Rotate once the active file is larger than this many bytes
    pub max_size_bytes: u64,
    /// Maximum number of backups to keep; 0 discards the old file
    pub pool_size: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: constants::DEFAULT_ROTATION_SIZE,
            pool_size: constants::DEFAULT_ROTATION_POOL,
        }
    }
}

impl RotationConfig {
    pub fn new(max_size_bytes: u64, pool_size: usize) -> Self {
        Self {
            max_size_bytes,
            pool_size,
        }
    }
}

impl From<&LogSettings> for RotationConfig {
    fn from(settings: &LogSettings) -> Self {
        Self::new(settings.max_size_bytes(), settings.pool_size())
    }
}

/// Strip the extension from the final component of `path`.
///
/// Falls back to the whole path when the file name has no extension or
/// would be left empty (`.hidden`).
pub fn backup_base(path: &str) -> &str {
    let name_start = path
        .rfind(|c: char| c == '/' || c == MAIN_SEPARATOR)
        .map_or(0, |i| i + 1);

    match path.rfind('.') {
        Some(dot) if dot > name_start => &path[..dot],
        _ => path,
    }
}

/// Path of backup `index` for `base`
pub fn backup_path(base: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{}-{}.{}", base, index, BACKUP_EXTENSION))
}

/// All backup slots for `path`, newest first
pub fn backup_paths(path: &str, pool_size: usize) -> Vec<PathBuf> {
    let base = backup_base(path);
    (1..=pool_size).map(|i| backup_path(base, i)).collect()
}

/// Backup slots for `path` that currently exist, newest first
pub fn existing_backups(path: &str, pool_size: usize) -> Vec<PathBuf> {
    backup_paths(path, pool_size)
        .into_iter()
        .filter(|p| p.exists())
        .collect()
}

/// Rotate the active file if it has grown past the threshold.
///
/// Returns true when the active file was moved aside (or discarded with a
/// zero-sized pool). Failures are reported through `tracing` only.
pub fn maybe_rotate(state: &mut LogState) -> bool {
    let Some(file) = state.stream() else {
        return false;
    };

    let size = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!("Failed to stat log file {}: {}", state.path(), e);
            return false;
        }
    };

    if size <= state.rotation().max_size_bytes {
        return false;
    }

    debug!(
        "Rotating log file {} ({} > {} bytes)",
        state.path(),
        size,
        state.rotation().max_size_bytes
    );
    rotate(state)
}

/// Rotate the active file regardless of its size.
///
/// Releases the handle before touching the filesystem; after a successful
/// rotation the next write reopens `path` in the configured mode. When the
/// file could not be moved aside it is reopened for appending, so a
/// truncating mode does not wipe what it holds.
pub fn rotate(state: &mut LogState) -> bool {
    if !state.is_configured() {
        return false;
    }

    state.release_stream();
    let rotated = rotate_files(state.path(), state.rotation().pool_size);

    if !rotated {
        if let Err(e) = state.reopen_appending() {
            warn!("Failed to reopen log file {}: {}", state.path(), e);
        }
    }
    rotated
}

/// Shift the backup chain and move the (closed) active file into slot 1
pub fn rotate_files(path: &str, pool_size: usize) -> bool {
    if pool_size == 0 {
        return match fs::remove_file(path) {
            Ok(()) => {
                debug!("remove: {}", path);
                true
            }
            Err(e) => {
                warn!("Failed to discard log file {}: {}", path, e);
                false
            }
        };
    }

    let base = backup_base(path);
    shift_backups(base, pool_size);

    let newest = backup_path(base, 1);
    for attempt in 1..=2 {
        match fs::rename(path, &newest) {
            Ok(()) => {
                debug!("rename: {} -> {}", path, newest.display());
                return true;
            }
            Err(e) => warn!(
                "Backup of log file {} failed (attempt {}): {}",
                path, attempt, e
            ),
        }
    }

    false
}

/// Move every existing backup one slot older, evicting the oldest.
///
/// Walks from the highest index down so each rename target has already been
/// vacated.
fn shift_backups(base: &str, pool_size: usize) {
    for i in (1..=pool_size).rev() {
        let candidate = backup_path(base, i);
        if !candidate.exists() {
            continue;
        }

        if i == pool_size {
            remove_backup(&candidate);
            continue;
        }

        let older = backup_path(base, i + 1);
        match fs::rename(&candidate, &older) {
            Ok(()) => debug!("rename: {} -> {}", candidate.display(), older.display()),
            Err(e) => {
                warn!(
                    "Failed to rename {} -> {}: {}",
                    candidate.display(),
                    older.display(),
                    e
                );
                remove_backup(&candidate);
            }
        }
    }
}

fn remove_backup(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("remove: {}", path.display()),
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path_str(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn test_backup_base() {
        assert_eq!(backup_base("app.log"), "app");
        assert_eq!(backup_base("applog"), "applog");
        assert_eq!(backup_base("/var/log/app.log"), "/var/log/app");
        assert_eq!(backup_base("archive.tar.gz"), "archive.tar");
        assert_eq!(backup_base(".hidden"), ".hidden");
        assert_eq!(backup_base("logs.d/app"), "logs.d/app");
        assert_eq!(backup_base("logs/.app"), "logs/.app");
    }

    #[test]
    fn test_backup_paths() {
        assert_eq!(backup_path("app", 1), PathBuf::from("app-1.log"));
        assert_eq!(
            backup_paths("/var/log/app.txt", 3),
            vec![
                PathBuf::from("/var/log/app-1.log"),
                PathBuf::from("/var/log/app-2.log"),
                PathBuf::from("/var/log/app-3.log"),
            ]
        );
        assert!(backup_paths("app.log", 0).is_empty());
    }

    #[test]
    fn test_rotate_files_moves_active_to_first_slot() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "current").unwrap();

        assert!(rotate_files(&path, 3));
        assert!(!Path::new(&path).exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("app-1.log")).unwrap(),
            "current"
        );
    }

    #[test]
    fn test_rotate_files_shifts_chain_and_evicts_oldest() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "new").unwrap();
        fs::write(dir.path().join("app-1.log"), "one").unwrap();
        fs::write(dir.path().join("app-2.log"), "two").unwrap();
        fs::write(dir.path().join("app-3.log"), "three").unwrap();

        assert!(rotate_files(&path, 3));

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("app-1.log"), "new");
        assert_eq!(read("app-2.log"), "one");
        assert_eq!(read("app-3.log"), "two");
        assert!(!dir.path().join("app-4.log").exists());
    }

    #[test]
    fn test_rotate_files_fills_gaps() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "new").unwrap();
        fs::write(dir.path().join("app-2.log"), "two").unwrap();

        assert!(rotate_files(&path, 3));

        assert_eq!(existing_backups(&path, 3).len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("app-3.log")).unwrap(),
            "two"
        );
    }

    #[test]
    fn test_rotate_files_zero_pool_discards() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "doomed").unwrap();

        assert!(rotate_files(&path, 0));
        assert!(!Path::new(&path).exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rotate_files_missing_active_file() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        assert!(!rotate_files(&path, 2));
        assert!(existing_backups(&path, 2).is_empty());
    }

    #[test]
    fn test_rotate_files_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "applog");
        fs::write(&path, "data").unwrap();

        assert!(rotate_files(&path, 1));
        assert!(dir.path().join("applog-1.log").exists());
    }

    #[test]
    fn test_maybe_rotate_respects_threshold() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "x".repeat(100)).unwrap();

        let mut state = LogState::new();
        state.set_rotation(RotationConfig::new(100, 2));
        state.open(&path, "a").unwrap();

        // Exactly at the threshold does not rotate
        assert!(!maybe_rotate(&mut state));
        assert!(state.is_open());

        fs::write(&path, "x".repeat(101)).unwrap();
        assert!(maybe_rotate(&mut state));
        assert!(!state.is_open());
        assert!(state.is_configured());
        assert!(dir.path().join("app-1.log").exists());
    }

    #[test]
    fn test_rotate_ignores_threshold() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "small").unwrap();

        let mut state = LogState::new();
        state.open(&path, "a").unwrap();

        assert!(rotate(&mut state));
        assert!(!state.is_open());
        assert_eq!(
            fs::read_to_string(dir.path().join("app-1.log")).unwrap(),
            "small"
        );

        assert!(!rotate(&mut LogState::new()));
    }

    #[test]
    fn test_blocked_backup_slot_keeps_active_file() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        // A non-empty directory in slot 1 defeats both the eviction and the rename
        let blocker = dir.path().join("app-1.log");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();
        fs::write(&path, "x".repeat(20)).unwrap();

        let mut state = LogState::new();
        state.set_rotation(RotationConfig::new(10, 1));
        state.open(&path, "a").unwrap();

        assert!(!maybe_rotate(&mut state));
        assert!(state.is_open());
        assert!(Path::new(&path).exists());
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_failed_shift_deletes_candidate() {
        let dir = TempDir::new().unwrap();
        let path = path_str(&dir, "app.log");
        fs::write(&path, "new").unwrap();
        fs::write(dir.path().join("app-1.log"), "one").unwrap();
        let blocker = dir.path().join("app-2.log");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        assert!(rotate_files(&path, 2));

        // app-2.log could not be evicted, so app-1.log was deleted instead of shifted
        assert!(blocker.is_dir());
        assert_eq!(
            fs::read_to_string(dir.path().join("app-1.log")).unwrap(),
            "new"
        );
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_maybe_rotate_without_stream() {
        let mut state = LogState::new();
        assert!(!maybe_rotate(&mut state));
    }

    #[test]
    fn test_rotation_config_from_settings() {
        let settings = LogSettings {
            max_size_bytes: Some(10),
            pool_size: Some(0),
            ..Default::default()
        };
        assert_eq!(RotationConfig::from(&settings), RotationConfig::new(10, 0));
    }
}
