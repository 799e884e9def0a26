//! Logs command - inspect the event log by customer, event or source

use anyhow::{bail, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Confirm;
use lendsqr_core::services::{EntryPoint, LogEntry, LogQuery, LoggingService};

use super::get_lendsqr_dir;
use crate::output;

/// Which front end wrote the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Cli,
    Server,
}

impl From<Source> for EntryPoint {
    fn from(source: Source) -> Self {
        match source {
            Source::Cli => EntryPoint::Cli,
            Source::Server => EntryPoint::Server,
        }
    }
}

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only entries about this customer id, e.g. LSQ00000001
        #[arg(long)]
        user: Option<String>,
        /// Only this event, e.g. users_fetch_failed
        #[arg(long)]
        event: Option<String>,
        /// Only entries written by `lq serve` or by the other commands
        #[arg(long, value_enum)]
        source: Option<Source>,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-event totals and database location
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn open_log() -> Result<LoggingService> {
    let dir = get_lendsqr_dir()?;
    std::fs::create_dir_all(&dir)?;
    LoggingService::new(&dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Build the query for `logs list`; blank ids and events are treated as absent
pub fn build_query(
    limit: usize,
    user: Option<String>,
    event: Option<String>,
    source: Option<Source>,
    errors: bool,
) -> Result<LogQuery> {
    if limit == 0 {
        bail!("--limit must be at least 1");
    }
    let mut query = LogQuery::recent(limit);
    if let Some(user) = user.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        query = query.for_user(user);
    }
    if let Some(event) = event.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        query = query.for_event(event);
    }
    if let Some(source) = source {
        query = query.from_entry_point(source.into());
    }
    if errors {
        query = query.errors_only();
    }
    Ok(query)
}

fn print_entries(entries: Vec<LogEntry>, query: &LogQuery) {
    if entries.is_empty() {
        match &query.user_id {
            Some(id) => println!("No log entries for {}.", id),
            None => println!("No log entries found."),
        }
        return;
    }

    let mut table = output::create_table();
    let mut header = vec!["Time", "Source", "Event", "Command"];
    // The customer column is redundant when filtering by one id
    let show_user = query.user_id.is_none();
    if show_user {
        header.push("Customer");
    }
    header.push("Error");
    table.set_header(header);

    for entry in entries {
        let event = if entry.error_message.is_some() {
            entry.event.red().to_string()
        } else {
            entry.event
        };
        let mut row = vec![
            format_timestamp(entry.timestamp),
            entry.entry_point,
            event,
            entry.command.unwrap_or_default(),
        ];
        if show_user {
            row.push(entry.user_id.unwrap_or_default());
        }
        row.push(entry.error_message.unwrap_or_default());
        table.add_row(row);
    }

    println!("{}", table);
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List {
            limit,
            user,
            event,
            source,
            errors,
            json,
        } => {
            let query = build_query(limit, user, event, source, errors)?;
            let service = open_log()?;
            let entries = service.query(&query)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(entries, &query);
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let service = open_log()?;
            let cutoff_ms = (Utc::now() - Duration::days(older_than_days)).timestamp_millis();

            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete logs older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::info("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff_ms)?;

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} log entries", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let service = open_log()?;
            let total = service.count()?;
            let events = service.event_counts()?;
            let customers = service.distinct_user_ids()?;
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "total_entries": total,
                        "customers_mentioned": customers,
                        "events": events,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Event Log".bold());
            println!("  Entries:   {}", total);
            println!("  Customers: {}", customers);
            println!("  Database:  {} ({})", db_path.display(), output::format_size(size_bytes));

            if !events.is_empty() {
                let mut table = output::create_table();
                table.set_header(vec!["Event", "Count", "Errors"]);
                for row in events {
                    let errors = if row.errors > 0 {
                        row.errors.to_string().red().to_string()
                    } else {
                        "0".to_string()
                    };
                    table.add_row(vec![row.event, row.count.to_string(), errors]);
                }
                println!();
                println!("{}", table);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_trims_and_maps_source() {
        let query = build_query(
            20,
            Some(" LSQ00000003 ".to_string()),
            Some("".to_string()),
            Some(Source::Server),
            true,
        )
        .unwrap();

        assert_eq!(query.limit, 20);
        assert_eq!(query.user_id.as_deref(), Some("LSQ00000003"));
        assert_eq!(query.event, None);
        assert_eq!(query.entry_point, Some(EntryPoint::Server));
        assert!(query.errors_only);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(build_query(0, None, None, None, false).is_err());
    }
}
