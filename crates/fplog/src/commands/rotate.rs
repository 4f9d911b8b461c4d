//! Rotate command implementation

use anyhow::{bail, Result};
use fplog_logs::{Logger, RotationConfig};

use crate::cli::{RotateArgs, TargetArgs};
use crate::output::{print_info, print_success};

pub fn execute(target: &TargetArgs, args: RotateArgs) -> Result<()> {
    let settings = super::load_settings(target)?;
    let path = super::require_path(&settings)?;
    let rotation = RotationConfig::from(&settings);

    let logger = Logger::builder().rotation(rotation.clone()).build();
    // Append mode leaves existing content alone whatever the configured mode
    logger.open(&path, "a")?;

    let rotated = if args.force {
        logger.rotate_now()
    } else {
        logger.maybe_rotate()
    };
    logger.close();

    if rotated {
        print_success(&format!("Rotated {}", path));
    } else if args.force {
        bail!("Could not rotate {}", path);
    } else {
        print_info(&format!(
            "{} is within {} bytes, not rotated",
            path, rotation.max_size_bytes
        ));
    }

    Ok(())
}
