/// # Test Utilities Module
///
/// Scratch-database fixtures shared by the unit tests. Every fixture lives in
/// its own temporary directory, so tests never share a database file.

use crate::core::db::Connection;
use crate::core::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Schema of the demo table
pub const EXAMPLE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS example_table (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);";

/// The three demo rows
pub const EXAMPLE_ROWS_SQL: &str =
    "INSERT INTO example_table (name, age) VALUES ('John', 25), ('Alice', 30), ('Bob', 22);";

/// Isolated database file fixture
pub struct DatabaseFixture {
    dir: TempDir,
    db_path: PathBuf,
}

impl DatabaseFixture {
    /// Reserves a database path inside a fresh temporary directory
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("test.db");
        Ok(DatabaseFixture { dir, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Opens the fixture database with `example_table` created and populated
    pub fn with_example_table(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(EXAMPLE_TABLE_SQL)?;
        conn.execute(EXAMPLE_ROWS_SQL)?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_is_isolated() {
        let a = DatabaseFixture::new().unwrap();
        let b = DatabaseFixture::new().unwrap();
        assert_ne!(a.db_path(), b.db_path());
        assert!(a.db_path().starts_with(a.dir()));
    }

    #[test]
    fn test_example_table_fixture() {
        let fixture = DatabaseFixture::new().unwrap();
        let conn = fixture.with_example_table().unwrap();
        let result = conn.execute("SELECT * FROM example_table").unwrap().unwrap();
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.column_count(), 3);
        assert_eq!(result.row(0).unwrap(), ["1", "John", "25"]);
    }
}
