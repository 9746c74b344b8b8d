/// Query Execution Module
///
/// Prepares SQL text into a statement, steps it row by row and either discards
/// the outcome (statements without result columns) or materializes a
/// [`ResultSet`]. Statements are finalized before returning on every path.

use crate::core::db::ResultSet;
use crate::core::{Result, SqliteError};
use rusqlite::{types::ValueRef, Batch, Connection, Statement};
use tracing::debug;

/// Statement execution service that operates on an open database connection
pub struct StatementExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> StatementExecutor<'a> {
    /// Creates a new StatementExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        StatementExecutor { connection }
    }

    /// Executes a single SQL statement.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for statements without result columns (CREATE, INSERT, ...),
    /// otherwise `Ok(Some(result))` holding every row the statement produced.
    ///
    /// # Errors
    ///
    /// - `SqliteError::Prepare` if the SQL cannot be compiled
    /// - `SqliteError::Step` if the engine fails while advancing the statement
    /// - `SqliteError::Execution` if the statement cannot be finalized
    pub fn execute(&self, sql: &str) -> Result<Option<ResultSet>> {
        let mut rows = Vec::new();
        let header = self.for_each_row(sql, |row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(header.map(|header| ResultSet::from_checked(header, rows)))
    }

    /// Executes a single SQL statement, handing each row to `on_row` as soon
    /// as the engine produces it.
    ///
    /// Rows arrive in engine order, one call per row, and the next row is not
    /// requested until `on_row` returns. An error from `on_row` stops the
    /// iteration and is returned unchanged.
    ///
    /// Returns the column names, or `None` if the statement has no result columns.
    pub fn for_each_row<F>(&self, sql: &str, mut on_row: F) -> Result<Option<Vec<String>>>
    where
        F: FnMut(Vec<String>) -> Result<()>,
    {
        debug!(sql, "preparing statement");
        let mut stmt = self.prepare_single(sql)?;

        let column_count = stmt.column_count();
        if column_count == 0 {
            stmt.execute([]).map_err(step_error)?;
            finalize(stmt)?;
            return Ok(None);
        }

        let header: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut row_count = 0usize;
        {
            let mut rows = stmt.query([]).map_err(step_error)?;
            while let Some(row) = rows.next().map_err(step_error)? {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(value_to_text(row.get_ref(i).map_err(step_error)?));
                }
                on_row(values)?;
                row_count += 1;
            }
        }
        finalize(stmt)?;

        debug!(columns = column_count, rows = row_count, "statement completed");
        Ok(Some(header))
    }

    /// Compiles exactly one statement from `sql`.
    ///
    /// Whitespace and comments around the statement are allowed. Text that is
    /// nothing but whitespace and comments, a second statement, or unbound
    /// `?` parameters are all `SqliteError::Prepare` failures.
    fn prepare_single(&self, sql: &str) -> Result<Statement<'a>> {
        let prepare_error = |e: rusqlite::Error| SqliteError::Prepare(e.to_string());
        let mut batch = Batch::new(self.connection, sql);

        let stmt = batch.next().map_err(prepare_error)?.ok_or_else(|| {
            SqliteError::Prepare("cannot execute an empty SQL statement".to_string())
        })?;

        // Any remaining text must compile to nothing. A later statement that
        // fails to compile (e.g. it uses a table the first one creates) still
        // counts as a second statement.
        if !matches!(batch.next(), Ok(None)) {
            return Err(SqliteError::Prepare(
                "multiple statements; use execute_batch".to_string(),
            ));
        }

        let parameters = stmt.parameter_count();
        if parameters > 0 {
            return Err(SqliteError::Prepare(format!(
                "statement has {} unbound parameter(s)",
                parameters
            )));
        }
        Ok(stmt)
    }
}

fn step_error(e: rusqlite::Error) -> SqliteError {
    SqliteError::Step(e.to_string())
}

fn finalize(stmt: Statement<'_>) -> Result<()> {
    stmt.finalize()
        .map_err(|e| SqliteError::Execution(format!("failed to finalize statement: {}", e)))
}

/// Converts a SQLite value to the text the engine itself would produce.
///
/// NULL becomes the literal `"NULL"`; BLOBs are read as (lossy) UTF-8.
pub fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => real_to_text(f),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

/// Renders a REAL with 15 significant digits, always keeping a fractional
/// part (`30.0`, `123.45`, `1.0e+20`).
fn real_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NULL".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    let scientific = format!("{:.14e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let sign = if value < 0.0 { "-" } else { "" };

    if (-4..15).contains(&exponent) {
        let (int_part, frac_part) = if exponent >= 0 {
            let split = exponent as usize + 1;
            if digits.len() > split {
                (digits[..split].to_string(), digits[split..].to_string())
            } else {
                (format!("{:0<split$}", digits), String::new())
            }
        } else {
            let leading_zeros = "0".repeat((-exponent - 1) as usize);
            ("0".to_string(), format!("{}{}", leading_zeros, digits))
        };
        let frac_part = if frac_part.is_empty() { "0".to_string() } else { frac_part };
        format!("{}{}.{}", sign, int_part, frac_part)
    } else {
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}{}.{}e{}{:02}", sign, first, rest, exponent_sign, exponent.abs())
    }
}
