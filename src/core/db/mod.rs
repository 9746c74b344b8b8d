/// Database Module
///
/// The database layer is split into three concerns:
/// - **Connection Management** (`connection.rs`): owns exactly one SQLite handle
/// - **Statement Execution** (`query.rs`): prepares, steps and finalizes statements
/// - **Result Sets** (`result.rs`): immutable header + rows snapshots
///
/// All operations return the crate's `SqliteError` on failure.
pub mod connection;
pub mod query;
pub mod result;

pub use connection::*;
pub use query::*;
pub use result::*;
