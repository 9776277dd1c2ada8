//! Output formatting utilities

use chrono::{TimeZone, Utc};
use clap::ValueEnum;
use colored::Colorize;
use monitor_lib::anomaly::AlertSeverity;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of rows
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any response as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format an epoch-milliseconds timestamp as a UTC date and time
pub fn format_timestamp(millis: f64) -> String {
    if !millis.is_finite() {
        return millis.to_string();
    }
    Utc.timestamp_millis_opt(millis as i64)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Format hours to failure, `-` when there is no prediction
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{:.1}h", h),
        None => "-".to_string(),
    }
}

/// Color a health score by band
pub fn color_health_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    if score >= 80.0 {
        formatted.green().to_string()
    } else if score >= 50.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color an alert severity
pub fn color_severity(severity: AlertSeverity) -> String {
    let label = severity.as_str();
    match severity {
        AlertSeverity::Info => label.blue().to_string(),
        AlertSeverity::Warning => label.yellow().to_string(),
        AlertSeverity::Critical => label.red().bold().to_string(),
    }
}

/// Color a yes/no flag, highlighting `true`
pub fn color_flag(flag: bool) -> String {
    if flag {
        "yes".red().to_string()
    } else {
        "no".green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000.0), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(Some(12.345)), "12.3h");
        assert_eq!(format_hours(None), "-");
    }
}
