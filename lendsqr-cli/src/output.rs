//! Output formatting utilities

use chrono::DateTime;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use lendsqr_core::UserStatus;

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Warnings go to stderr so JSON/CSV on stdout stays clean
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Status badge colors as on the users table
pub fn status_cell(status: UserStatus) -> Cell {
    let color = match status {
        UserStatus::Active => Color::Green,
        UserStatus::Inactive => Color::DarkGrey,
        UserStatus::Pending => Color::Yellow,
        UserStatus::Blacklisted => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

/// "May 15, 2020 10:00 AM"; unparseable input is shown as is
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%b %-d, %Y %-I:%M %p").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Filled and hollow stars, e.g. "★☆☆"
pub fn stars(filled: u8, total: u8) -> String {
    (0..total)
        .map(|i| if i < filled { '★' } else { '☆' })
        .collect()
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
