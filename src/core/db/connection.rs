/// Connection Management Module
///
/// A [`Connection`] owns exactly one SQLite handle for its whole lifetime.
/// The handle is released by `close()` or, failing that, when the value is
/// dropped, so it never outlives its owner on any exit path.

use crate::config::DatabaseConfig;
use crate::core::db::{ResultSet, StatementExecutor};
use crate::core::{Result, SqliteError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Path reported for in-memory databases
pub const IN_MEMORY_PATH: &str = ":memory:";

/// An open (or explicitly closed) database connection
#[derive(Debug)]
pub struct Connection {
    /// Active engine handle (None once closed)
    handle: Option<rusqlite::Connection>,
    /// Path the handle was opened from
    path: PathBuf,
}

impl Connection {
    /// Opens the database file at `path`, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteError::Open` with the engine's diagnostic if the file
    /// cannot be opened or created as a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let handle = rusqlite::Connection::open(path).map_err(|e| SqliteError::Open(e.to_string()))?;
        debug!(path = %path.display(), "opened database");
        Ok(Connection {
            handle: Some(handle),
            path: path.to_path_buf(),
        })
    }

    /// Opens a private, temporary in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let handle =
            rusqlite::Connection::open_in_memory().map_err(|e| SqliteError::Open(e.to_string()))?;
        debug!("opened in-memory database");
        Ok(Connection {
            handle: Some(handle),
            path: PathBuf::from(IN_MEMORY_PATH),
        })
    }

    /// Opens the database described by `config` and applies its session
    /// settings.
    ///
    /// If a setting cannot be applied the freshly acquired handle is closed
    /// before the error is returned.
    pub fn open_with_config(config: &DatabaseConfig) -> Result<Self> {
        let connection = if config.path == Path::new(IN_MEMORY_PATH) {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)?
        };
        connection.apply_settings(config)?;
        Ok(connection)
    }

    fn apply_settings(&self, config: &DatabaseConfig) -> Result<()> {
        let handle = self.handle()?;
        let setting_error = |e: rusqlite::Error| SqliteError::Open(e.to_string());

        if let Some(timeout) = config.busy_timeout_ms {
            handle
                .busy_timeout(Duration::from_millis(timeout))
                .map_err(setting_error)?;
        }
        if let Some(enabled) = config.foreign_keys {
            handle
                .pragma_update(None, "foreign_keys", enabled)
                .map_err(setting_error)?;
        }
        for pragma in &config.pragmas {
            debug!(pragma = %pragma, "applying pragma");
            // Some pragmas report their new value as a row, so step through
            // the executor rather than a plain execute.
            self.execute(&format!("PRAGMA {}", pragma))
                .map_err(|e| SqliteError::Open(format!("PRAGMA {} failed: {}", pragma, e)))?;
        }
        Ok(())
    }

    /// Path of the database file (`:memory:` for in-memory databases)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether the handle is still held
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Executes a single SQL statement.
    ///
    /// Returns `None` for statements without result columns, otherwise the
    /// fully materialized result set.
    ///
    /// # Errors
    ///
    /// `SqliteError::Execution` if the connection is closed; otherwise whatever
    /// the statement executor reports.
    pub fn execute(&self, sql: &str) -> Result<Option<ResultSet>> {
        StatementExecutor::new(self.handle()?).execute(sql)
    }

    /// Executes a single SQL statement, handing each row to `on_row` as it is
    /// produced instead of materializing the result.
    pub fn for_each_row<F>(&self, sql: &str, on_row: F) -> Result<Option<Vec<String>>>
    where
        F: FnMut(Vec<String>) -> Result<()>,
    {
        StatementExecutor::new(self.handle()?).for_each_row(sql, on_row)
    }

    /// Executes a script of zero or more `;`-separated statements, discarding
    /// any rows they produce.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.handle()?
            .execute_batch(sql)
            .map_err(|e| SqliteError::Execution(e.to_string()))
    }

    /// Closes the database handle.
    ///
    /// Calling this on an already closed connection is a no-op.
    ///
    /// # Errors
    ///
    /// `SqliteError::Execution` if the engine refuses to close. The handle is
    /// kept in that case so a later `close()` or drop can retry.
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.close() {
            Ok(()) => {
                debug!(path = %self.path.display(), "closed database");
                Ok(())
            }
            Err((handle, e)) => {
                self.handle = Some(handle);
                Err(SqliteError::Execution(format!("failed to close database: {}", e)))
            }
        }
    }

    fn handle(&self) -> Result<&rusqlite::Connection> {
        self.handle
            .as_ref()
            .ok_or_else(|| SqliteError::Execution("database is not open".to_string()))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "database not closed cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::test_utils::DatabaseFixture;

    #[test]
    fn test_open_and_close() {
        let fixture = DatabaseFixture::new().unwrap();
        let mut conn = Connection::open(fixture.db_path()).unwrap();
        assert!(conn.is_open());
        assert_eq!(conn.path(), fixture.db_path());
        assert!(fixture.db_path().exists());

        conn.close().unwrap();
        assert!(!conn.is_open());
        // Closing twice is a no-op
        conn.close().unwrap();
    }

    #[test]
    fn test_open_in_memory() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(conn.is_open());
        assert_eq!(conn.path(), Path::new(IN_MEMORY_PATH));
    }

    #[test]
    fn test_connection_error_handling() {
        // Invalid database path should fail
        let result = Connection::open("/nonexistent/path/database.db");
        match result {
            Err(SqliteError::Open(msg)) => assert!(msg.contains("unable to open")),
            other => panic!("Expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_after_close_fails() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.close().unwrap();

        let err = conn.execute("SELECT 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(err.to_string().contains("database is not open"));

        assert_eq!(conn.execute_batch("SELECT 1").unwrap_err().kind(), ErrorKind::Execution);
        assert_eq!(
            conn.for_each_row("SELECT 1", |_| Ok(())).unwrap_err().kind(),
            ErrorKind::Execution
        );
    }

    #[test]
    fn test_execute_batch() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO t (name) VALUES ('a');
             INSERT INTO t (name) VALUES ('b');",
        )
        .unwrap();

        let result = conn.execute("SELECT name FROM t ORDER BY id").unwrap().unwrap();
        assert_eq!(result.rows(), [vec!["a".to_string()], vec!["b".to_string()]]);

        let err = conn.execute_batch("INSERT INTO missing VALUES (1);").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_open_with_config_applies_settings() {
        let fixture = DatabaseFixture::new().unwrap();
        let config = DatabaseConfig {
            path: fixture.db_path().to_path_buf(),
            busy_timeout_ms: Some(250),
            foreign_keys: Some(true),
            pragmas: vec!["user_version = 7".to_string()],
        };

        let conn = Connection::open_with_config(&config).unwrap();
        let fk = conn.execute("PRAGMA foreign_keys").unwrap().unwrap();
        assert_eq!(fk.rows()[0][0], "1");
        let version = conn.execute("PRAGMA user_version").unwrap().unwrap();
        assert_eq!(version.rows()[0][0], "7");
    }

    #[test]
    fn test_open_with_config_rejects_bad_pragma() {
        let config = DatabaseConfig {
            path: PathBuf::from(IN_MEMORY_PATH),
            pragmas: vec!["this is not a pragma".to_string()],
            ..DatabaseConfig::default()
        };

        let err = Connection::open_with_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Open);
        assert!(err.to_string().contains("PRAGMA this is not a pragma failed"));
    }

    #[test]
    fn test_drop_releases_file_lock() {
        let fixture = DatabaseFixture::new().unwrap();
        {
            let conn = Connection::open(fixture.db_path()).unwrap();
            conn.execute("CREATE TABLE t (id INTEGER)").unwrap();
            conn.execute("BEGIN EXCLUSIVE").unwrap();
            // Dropped while holding an exclusive lock
        }

        let other = Connection::open(fixture.db_path()).unwrap();
        assert!(other.execute("INSERT INTO t VALUES (1)").unwrap().is_none());
    }
}
