/// Core Module
///
/// The error model and the database layer: connection ownership, statement
/// execution and materialized result sets.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, Result, SqliteError};
