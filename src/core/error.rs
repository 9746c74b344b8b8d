/// Error Module
///
/// Every failure the helper layer can report is a variant of [`SqliteError`].
/// The variant is the kind; the payload is the engine's own diagnostic text,
/// and the display prefix names the operation that failed.
use thiserror::Error;

/// Structured failure raised whenever SQLite reports a non-success status,
/// or the layer around it cannot do its job.
#[derive(Error, Debug)]
pub enum SqliteError {
    /// The database file could not be opened, created or initialized
    #[error("Error opening the database: {0}")]
    Open(String),

    /// SQL text could not be compiled (syntax error, unknown table/column, ...)
    #[error("Error preparing SQL statement: {0}")]
    Prepare(String),

    /// A prepared statement reported an unexpected status while advancing
    #[error("Error stepping SQL statement: {0}")]
    Step(String),

    /// Any other execution failure, including use of a closed connection
    #[error("Error executing SQL statement: {0}")]
    Execution(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A result set whose rows do not match its header
    #[error("Malformed result set: {0}")]
    Shape(String),

    /// Writing formatted output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON export errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Fieldless tag for each [`SqliteError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Prepare,
    Step,
    Execution,
    Config,
    Shape,
    Io,
    Json,
    Csv,
}

impl SqliteError {
    /// Returns the kind of this failure without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqliteError::Open(_) => ErrorKind::Open,
            SqliteError::Prepare(_) => ErrorKind::Prepare,
            SqliteError::Step(_) => ErrorKind::Step,
            SqliteError::Execution(_) => ErrorKind::Execution,
            SqliteError::Config(_) => ErrorKind::Config,
            SqliteError::Shape(_) => ErrorKind::Shape,
            SqliteError::Io(_) => ErrorKind::Io,
            SqliteError::Json(_) => ErrorKind::Json,
            SqliteError::Csv(_) => ErrorKind::Csv,
        }
    }
}

/// Type alias for Result to use SqliteError as the error type.
pub type Result<T> = std::result::Result<T, SqliteError>;
