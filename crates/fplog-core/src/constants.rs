//! Constants and default values for fplog

/// Longest accepted log path, in bytes
pub const MAX_PATH_BYTES: usize = 255;

/// Longest accepted open-mode descriptor, in bytes
pub const MAX_MODE_BYTES: usize = 9;

/// Capacity of a rendered log line, in bytes (content is limited to one less)
pub const LINE_CAPACITY: usize = 2048;

/// Longest timestamp kept in a rendered line, in bytes
pub const MAX_TIMESTAMP_BYTES: usize = 255;

/// Default rotation threshold in bytes (1MB)
pub const DEFAULT_ROTATION_SIZE: u64 = 1024 * 1024;

/// Default number of rotated backups to keep
pub const DEFAULT_ROTATION_POOL: usize = 5;

/// Default open mode (append)
pub const DEFAULT_MODE: &str = "a";

/// Extension used for every backup file
pub const BACKUP_EXTENSION: &str = "log";

/// Timestamp layout used by the default clock
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Settings file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &["fplog.toml", "fplog.yaml", "fplog.yml", "fplog.json"];
