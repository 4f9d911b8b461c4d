//! Tail command implementation

use anyhow::Result;
use fplog_core::Error;
use fplog_logs::LogReader;
use regex::Regex;
use std::path::PathBuf;

use crate::cli::{TailArgs, TargetArgs};
use crate::output::print_logs;

pub async fn execute(target: &TargetArgs, args: TailArgs) -> Result<()> {
    let settings = super::load_settings(target)?;
    let path = super::require_path(&settings)?;
    let reader = LogReader::new(PathBuf::from(path)).with_pool_size(settings.pool_size());

    let grep = args
        .grep
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| Error::InvalidPattern(e.to_string()))?;

    let lines = if args.all {
        reader.tail_all(args.lines)?
    } else {
        reader.tail(args.lines)?
    };

    let lines: Vec<String> = lines
        .into_iter()
        .filter(|line| matches(grep.as_ref(), line))
        .collect();
    print_logs(&lines);

    if args.follow {
        let mut rx = reader.follow()?;
        while let Some(line) = rx.recv().await {
            if matches(grep.as_ref(), &line) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn matches(grep: Option<&Regex>, line: &str) -> bool {
    grep.map_or(true, |re| re.is_match(line))
}
