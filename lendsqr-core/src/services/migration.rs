//! Migration service - manages embedded DuckDB schema migrations
//!
//! Both the key-value database and the log database carry a migration set.
//! Applied migrations are tracked in `sys_migrations` so runs are idempotent.

use duckdb::Connection;

use crate::domain::result::Result;

/// Name of the bootstrap migration that creates `sys_migrations`
const BOOTSTRAP: &str = "000_migrations.sql";

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for applying a migration set to a connection
pub struct MigrationService<'a> {
    conn: &'a Connection,
    migrations: &'static [(&'static str, &'static str)],
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, migrations: &'static [(&'static str, &'static str)]) -> Self {
        Self { conn, migrations }
    }

    /// Run all pending migrations
    ///
    /// 1. Bootstraps `sys_migrations` if it does not exist
    /// 2. Applies every migration not yet recorded, in order
    /// 3. Records each applied migration
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let mut newly_applied = Vec::new();

        let bootstrap_ran = if !self.migrations_table_exists() {
            match self.migrations.iter().find(|(n, _)| *n == BOOTSTRAP) {
                Some((name, sql)) => {
                    self.conn.execute_batch(sql)?;
                    self.record_migration(name)?;
                    newly_applied.push(name.to_string());
                    true
                }
                None => false,
            }
        } else {
            false
        };

        let applied_set = self.get_applied()?;
        let already_applied = if bootstrap_ran {
            applied_set.len().saturating_sub(1)
        } else {
            applied_set.len()
        };

        for (name, sql) in self.migrations.iter() {
            if *name == BOOTSTRAP {
                continue;
            }
            if !applied_set.iter().any(|applied| applied == name) {
                self.conn.execute_batch(sql)?;
                self.record_migration(name)?;
                newly_applied.push(name.to_string());
            }
        }

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied,
        })
    }

    fn migrations_table_exists(&self) -> bool {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .unwrap_or(false)
    }

    /// Names of already applied migrations
    pub fn get_applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for name in names {
            result.push(name?);
        }
        Ok(result)
    }

    fn record_migration(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_migrations::LOG_MIGRATIONS;
    use crate::migrations::MIGRATIONS;

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn, MIGRATIONS);

        let result = service.run_pending().unwrap();
        assert_eq!(result.applied.len(), MIGRATIONS.len());
        assert_eq!(result.already_applied, 0);

        let again = service.run_pending().unwrap();
        assert!(again.applied.is_empty());
        assert_eq!(again.already_applied, MIGRATIONS.len());
    }

    #[test]
    fn test_log_migrations_apply() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn, LOG_MIGRATIONS);
        service.run_pending().unwrap();

        let applied = service.get_applied().unwrap();
        assert_eq!(applied, vec!["000_migrations.sql", "001_initial_schema.sql"]);
    }
}
