/// Result Set Module
///
/// An immutable snapshot of a query's column names and row values. Every cell
/// is already text; SQL NULL is the literal string `"NULL"`.

use crate::core::{Result, SqliteError};
use crate::table_printer::TablePrinter;
use serde_json::{Map, Value};
use std::fmt;
use std::io;

/// Materialized header + rows of a query.
///
/// Invariant: every row has exactly `header.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultSet {
    /// Creates a result set from column names and rows.
    ///
    /// # Errors
    ///
    /// Returns `SqliteError::Shape` if any row's width differs from the header's.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(SqliteError::Shape(format!(
                "row {} has {} cells but the header has {} columns",
                index,
                row.len(),
                header.len()
            )));
        }
        Ok(ResultSet { header, rows })
    }

    /// Builds a result set whose shape the caller has already guaranteed.
    pub(crate) fn from_checked(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == header.len()));
        ResultSet { header, rows }
    }

    /// Column names, in select-list order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// All rows, in the order the engine produced them.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The row at `index`, if there is one.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns; taken from the header, so a query that returned no
    /// rows still reports its columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// True when the query produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<String>> {
        self.rows.iter()
    }

    /// Consumes the result set, returning `(header, rows)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.header, self.rows)
    }

    /// Exports the result set as CSV, header first.
    ///
    /// Cells containing a comma, a double quote or a line break are quoted,
    /// with embedded quotes doubled.
    pub fn to_csv(&self) -> Result<String> {
        if self.header.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner().map_err(|e| SqliteError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| SqliteError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Exports the rows as a JSON array of objects keyed by column name.
    ///
    /// Keys keep select-list order. If a column name repeats, the later
    /// column's value wins.
    pub fn to_json(&self) -> Result<String> {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .header
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(Value::String))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Ok(serde_json::to_string(&rows)?)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Vec<String>;
    type IntoIter = std::slice::Iter<'a, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TablePrinter::new(self).render())
    }
}
