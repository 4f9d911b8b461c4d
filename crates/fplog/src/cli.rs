//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use fplog_core::{LogSettings, Severity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fplog")]
#[command(version, about = "Timestamped log files with size-based rotation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

/// Which log file to use and how it rotates. Flags override the settings file.
#[derive(Args)]
pub struct TargetArgs {
    /// Settings file (.toml, .yaml, .yml or .json); defaults to fplog.* in the current directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(short, long, global = true, env = "FPLOG_FILE")]
    pub file: Option<String>,

    /// Open mode ("a" appends, "w" truncates)
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Minimum severity that is written
    #[arg(long, global = true)]
    pub level: Option<Severity>,

    /// Rotate once the file is larger than this many bytes
    #[arg(long, global = true)]
    pub max_size: Option<u64>,

    /// Number of rotated backups to keep
    #[arg(long, global = true)]
    pub pool: Option<usize>,
}

impl TargetArgs {
    /// Settings made of the flags that were given
    pub fn overrides(&self) -> LogSettings {
        LogSettings {
            path: self.file.clone(),
            mode: self.mode.clone(),
            level: self.level,
            max_size_bytes: self.max_size,
            pool_size: self.pool,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append messages to the log (reads lines from stdin when none are given)
    Write(WriteArgs),

    /// Show the end of the log
    Tail(TailArgs),

    /// Rotate the log now if it is over its size limit
    Rotate(RotateArgs),

    /// List rotated backups
    Backups,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Messages to write, one line each
    pub messages: Vec<String>,

    /// Severity of the messages
    #[arg(short, long, default_value = "info")]
    pub severity: Severity,
}

#[derive(Args)]
pub struct RotateArgs {
    /// Rotate even if the file is within its size limit
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TailArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value = "15")]
    pub lines: usize,

    /// Include rotated backups, oldest first
    #[arg(short, long)]
    pub all: bool,

    /// Only show lines matching this regex
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Keep printing lines as they are written
    #[arg(short = 'F', long)]
    pub follow: bool,
}
