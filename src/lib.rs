// Core infrastructure modules
pub mod core;

// Configuration and output
pub mod config;
pub mod table_printer;

#[cfg(test)]
mod test_utils;

pub use crate::core::db::{Connection, ResultSet, StatementExecutor};
pub use crate::core::{ErrorKind, Result, SqliteError};
pub use crate::table_printer::TablePrinter;
