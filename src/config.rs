use crate::core::{Result, SqliteError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Database file opened when nothing else is configured
pub const DEFAULT_DATABASE_PATH: &str = "example.db";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database-related configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`
    pub path: PathBuf,
    /// How long to wait on a locked database before reporting busy
    pub busy_timeout_ms: Option<u64>,
    /// Enforce foreign key constraints (engine default when unset)
    pub foreign_keys: Option<bool>,
    /// Extra settings, each run as `PRAGMA <entry>` right after opening
    pub pragmas: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            busy_timeout_ms: None,
            foreign_keys: None,
            pragmas: Vec::new(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqlite_helper::config::load_config("sqlite-helper.toml")?;
/// println!("{:?}", config.database.path);
/// # Ok::<(), sqlite_helper::SqliteError>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SqliteError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| SqliteError::Config(e.to_string()))
}
