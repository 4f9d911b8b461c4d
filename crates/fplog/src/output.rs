//! Terminal output formatting

use colored::Colorize;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

pub fn print_success(message: &str) {
    if is_json_mode() {
        print_json(&serde_json::json!({ "success": true, "message": message }));
        return;
    }
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    if is_json_mode() {
        print_json(&serde_json::json!({ "success": true, "message": message }));
        return;
    }
    println!("{} {}", "ℹ".blue(), message);
}

/// Print log lines, as a JSON array if enabled
pub fn print_logs(lines: &[String]) {
    if is_json_mode() {
        print_json(&lines);
        return;
    }

    for line in lines {
        println!("{}", line);
    }
}

/// One rotated backup
#[derive(Serialize)]
pub struct BackupRow {
    pub index: usize,
    pub path: String,
    pub bytes: u64,
}

pub fn print_backups(rows: &[BackupRow]) {
    if is_json_mode() {
        print_json(&rows);
        return;
    }

    if rows.is_empty() {
        print_info("No backups");
        return;
    }

    for row in rows {
        println!(
            "{:>3}  {:>10}  {}",
            row.index.to_string().cyan(),
            format_bytes(row.bytes),
            row.path
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

/// Format bytes to human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1}mb", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}kb", bytes as f64 / KB as f64)
    } else {
        format!("{}b", bytes)
    }
}
