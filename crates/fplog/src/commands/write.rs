//! Write command implementation

use anyhow::Result;
use fplog_logs::{DiagnosticAdapter, Logger};
use std::io::{self, BufRead};

use crate::cli::{TargetArgs, WriteArgs};
use crate::output::print_success;

pub fn execute(target: &TargetArgs, args: WriteArgs) -> Result<()> {
    let settings = super::load_settings(target)?;
    let logger = Logger::from_settings(&settings)?;
    let mut written = 0usize;

    if args.messages.is_empty() {
        // Piped lines are passed through as-is, like a library's diagnostic stream
        let adapter = DiagnosticAdapter::new(&logger);
        for line in io::stdin().lock().lines() {
            adapter.on_diagnostic(&(), args.severity.level(), &line?);
            written += 1;
        }
    } else {
        for message in &args.messages {
            if logger.log(args.severity, format_args!("{}", message))?.is_some() {
                written += 1;
            }
        }
    }

    if let Some(path) = logger.path() {
        print_success(&format!("Wrote {} line(s) to {}", written, path));
    }
    logger.close();

    Ok(())
}
