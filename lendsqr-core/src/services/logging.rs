//! Logging service - structured event logging to DuckDB
//!
//! Events go to logs.duckdb next to the session database. Only event names,
//! command names, user ids and error text are recorded; never credentials,
//! tokens or customer records.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::Connection;
use serde::{Deserialize, Serialize};

use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::MigrationService;

/// File name of the log database inside the data directory
pub const LOG_DB_FILE: &str = "logs.duckdb";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique id: millisecond timestamp in the high bits, counter in the low 16
fn generate_id() -> u64 {
    let timestamp = now_ms().max(0) as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Which front end produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Server,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Server => "server",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            user_id: None,
            error_message: None,
            error_details: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Id of the customer record the event concerns
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// Filter for [`LoggingService::query`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub limit: usize,
    pub errors_only: bool,
    pub user_id: Option<String>,
    pub event: Option<String>,
    pub entry_point: Option<EntryPoint>,
}

impl LogQuery {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn errors_only(mut self) -> Self {
        self.errors_only = true;
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn for_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn from_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.entry_point = Some(entry_point);
        self
    }
}

/// Row of [`LoggingService::event_counts`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCount {
    pub event: String,
    pub count: u64,
    pub errors: u64,
}

/// A log entry as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub user_id: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

const SELECT_COLUMNS: &str = "SELECT id, timestamp, entry_point, app_version, platform, \
     event, command, user_id, error_message, error_details FROM sys_logs";

fn map_entry(row: &duckdb::Row<'_>) -> duckdb::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        entry_point: row.get(2)?,
        app_version: row.get(3)?,
        platform: row.get(4)?,
        event: row.get(5)?,
        command: row.get(6)?,
        user_id: row.get(7)?,
        error_message: row.get(8)?,
        error_details: row.get(9)?,
    })
}

/// Service for structured event logging
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open or create logs.duckdb in `data_dir` and apply log migrations
    pub fn new(
        data_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        let db_path = data_dir.join(LOG_DB_FILE);
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Record an event, stamping entry point, version and platform
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO sys_logs (
                id, timestamp, entry_point, app_version, platform,
                event, command, user_id, error_message, error_details
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            duckdb::params![
                generate_id(),
                now_ms(),
                self.entry_point.as_str(),
                &self.app_version,
                self.platform,
                &event.event,
                &event.command,
                &event.user_id,
                &event.error_message,
                &event.error_details,
            ],
        )?;

        Ok(())
    }

    /// Entries matching `query`, most recent first
    pub fn query(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let mut clauses = Vec::new();
        let mut params: Vec<Box<dyn duckdb::ToSql>> = Vec::new();

        if query.errors_only {
            clauses.push("error_message IS NOT NULL");
        }
        if let Some(user_id) = &query.user_id {
            clauses.push("user_id = ?");
            params.push(Box::new(user_id.clone()));
        }
        if let Some(event) = &query.event {
            clauses.push("event = ?");
            params.push(Box::new(event.clone()));
        }
        if let Some(entry_point) = query.entry_point {
            clauses.push("entry_point = ?");
            params.push(Box::new(entry_point.as_str()));
        }
        params.push(Box::new(query.limit as i64));

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "{}{} ORDER BY timestamp DESC, id DESC LIMIT ?",
            SELECT_COLUMNS, where_clause
        );

        let param_refs: Vec<&dyn duckdb::ToSql> = params.iter().map(|b| b.as_ref()).collect();

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(param_refs.as_slice(), map_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Per-event totals, largest first
    pub fn event_counts(&self) -> Result<Vec<EventCount>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT event, COUNT(*) AS n, COUNT(error_message) AS errors \
             FROM sys_logs GROUP BY event ORDER BY n DESC, event",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(EventCount {
                    event: row.get(0)?,
                    count: row.get(1)?,
                    errors: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(counts)
    }

    /// Number of distinct customer ids mentioned in the log
    pub fn distinct_user_ids(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: u64 = conn.query_row(
            "SELECT COUNT(DISTINCT user_id) FROM sys_logs",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete logs older than `timestamp_ms` (unix ms); returns rows removed
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
