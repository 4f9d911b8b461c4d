//! Backups command implementation

use anyhow::Result;
use fplog_logs::rotation;

use crate::cli::TargetArgs;
use crate::output::{print_backups, BackupRow};

pub fn execute(target: &TargetArgs) -> Result<()> {
    let settings = super::load_settings(target)?;
    let path = super::require_path(&settings)?;

    let mut rows = Vec::new();
    for (i, backup) in rotation::backup_paths(&path, settings.pool_size())
        .into_iter()
        .enumerate()
    {
        if let Ok(meta) = std::fs::metadata(&backup) {
            rows.push(BackupRow {
                index: i + 1,
                path: backup.display().to_string(),
                bytes: meta.len(),
            });
        }
    }

    print_backups(&rows);
    Ok(())
}
