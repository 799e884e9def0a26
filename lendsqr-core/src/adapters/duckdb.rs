//! DuckDB-backed key-value store
//!
//! Persists the session area (token, auth user, cached user list) in a
//! single `sys_kv` table so state survives between CLI invocations.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::migrations::MIGRATIONS;
use crate::ports::KeyValueStore;
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Key-value store persisted in a DuckDB file
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) the store at `db_path` and apply migrations
    ///
    /// Retries with exponential backoff when another process holds the file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut attempt = 0;
        let conn = loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => break conn,
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[lendsqr] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        };

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path.to_path_buf()),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open a transient in-memory store with the schema applied
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading off: the store only needs core SQL
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Ensure the `sys_kv` schema exists
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for DuckDbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT kv_value FROM sys_kv WHERE kv_key = ?")?;
        let mut rows = stmt.query_map([key], |row| row.get::<_, String>(0))?;

        match rows.next() {
            Some(value) => Ok(Some(value?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO sys_kv (kv_key, kv_value, updated_at) VALUES (?, ?, current_timestamp)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_kv WHERE kv_key = ?", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT kv_key FROM sys_kv ORDER BY kv_key")?;
        let keys = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for key in keys {
            result.push(key?);
        }
        Ok(result)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_kv", [])?;
        Ok(())
    }
}
