//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table of rows, or "No items found" when empty
pub fn print_rows<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any response as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
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

/// Format a dollar amount
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a utilisation percentage
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Color a utilisation percentage by how loaded it is
pub fn color_usage(value: f64) -> String {
    let formatted = format_percent(value);
    if value >= 80.0 {
        formatted.red().to_string()
    } else if value >= 60.0 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "ready" | "running" | "healthy" | "completed" | "true" => status.green().to_string(),
        "pending" | "degraded" | "warning" | "medium" => status.yellow().to_string(),
        "notready" | "error" | "unhealthy" | "critical" | "high" | "false" => {
            status.red().to_string()
        }
        _ => status.to_string(),
    }
}

/// Format an RFC 3339 timestamp for display
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(200.0), "$200.00");
        assert_eq!(format_currency(6612.5), "$6612.50");
    }

    #[test]
    fn test_format_timestamp_falls_back_to_raw() {
        assert_eq!(
            format_timestamp("2024-03-01T10:15:00+00:00"),
            "2024-03-01 10:15:00"
        );
        assert_eq!(format_timestamp("10:15"), "10:15");
    }

    #[test]
    fn test_color_status_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_status("Ready"), "Ready");
        assert_eq!(color_status("NotReady"), "NotReady");
        assert_eq!(color_usage(85.0), "85.0%");
    }
}
