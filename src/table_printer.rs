/// Table Printer Module
///
/// Formats a result set as an aligned, pipe-delimited text table:
///
/// ```text
/// id | name  | age
/// ------------------
/// 1  | John  | 25
/// 2  | Alice | 30
/// ```
///
/// Every cell is left-justified to its column's width, the widest header or
/// data cell in that column, measured in characters.

use crate::core::db::ResultSet;
use crate::core::Result;
use std::io::{self, Write};

/// Placed between adjacent cells
pub const COLUMN_DELIMITER: &str = " | ";

/// Printed instead of a table when there are no rows
pub const EMPTY_RESULT_NOTICE: &str = "Empty result set.";

/// Borrowed view over a header and its rows, ready to be formatted.
#[derive(Debug, Clone, Copy)]
pub struct TablePrinter<'a> {
    header: &'a [String],
    rows: &'a [Vec<String>],
}

impl<'a> TablePrinter<'a> {
    /// Creates a printer for a materialized result set.
    pub fn new(result: &'a ResultSet) -> Self {
        TablePrinter {
            header: result.header(),
            rows: result.rows(),
        }
    }

    /// Creates a printer over raw column names and rows.
    ///
    /// The header decides the column count: cells missing from a short row
    /// print as empty, cells beyond the header are ignored.
    pub fn from_parts(header: &'a [String], rows: &'a [Vec<String>]) -> Self {
        TablePrinter { header, rows }
    }

    /// Display width of each column.
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.header.len())
            .map(|i| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .chain(std::iter::once(&self.header[i]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders the table, or the empty-result notice, as a newline-terminated string.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return format!("{}\n", EMPTY_RESULT_NOTICE);
        }

        let widths = self.column_widths();
        let mut output = String::new();

        push_line(&mut output, self.header.iter().map(String::as_str), &widths);

        output.push_str(&"-".repeat(separator_width(&widths)));
        output.push('\n');

        for row in self.rows {
            let cells = (0..widths.len()).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
            push_line(&mut output, cells, &widths);
        }
        output
    }

    /// Writes the rendered table to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.render().as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Writes the rendered table to standard output.
    pub fn print(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle)
    }
}

/// Length of the dash line under the header: every column width plus one
/// three-character delimiter per column, less one.
pub fn separator_width(widths: &[usize]) -> usize {
    (COLUMN_DELIMITER.len() * widths.len() + widths.iter().sum::<usize>()).saturating_sub(1)
}

fn push_line<'c>(output: &mut String, cells: impl Iterator<Item = &'c str>, widths: &[usize]) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    output.push_str(&padded.join(COLUMN_DELIMITER));
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_empty_result() {
        let result = ResultSet::new(strings(&["id", "name"]), Vec::new()).unwrap();
        assert_eq!(TablePrinter::new(&result).render(), "Empty result set.\n");
    }

    #[test]
    fn test_render_with_headers_and_rows() {
        let result = ResultSet::new(
            strings(&["ID", "Name"]),
            vec![strings(&["1", "Alice"]), strings(&["2", "Bob"])],
        )
        .unwrap();

        let expected = [
            "ID | Name ",
            "------------",
            "1  | Alice",
            "2  | Bob  ",
        ]
        .join("\n")
            + "\n";
        assert_eq!(TablePrinter::new(&result).render(), expected);
    }

    #[test]
    fn test_header_wider_than_data() {
        let header = strings(&["identifier", "x"]);
        let rows = vec![strings(&["7", "y"])];
        let printer = TablePrinter::from_parts(&header, &rows);
        assert_eq!(printer.column_widths(), vec![10, 1]);
        assert!(printer.render().starts_with("identifier | x\n"));
    }

    #[test]
    fn test_widths_count_characters() {
        let header = strings(&["city"]);
        let rows = vec![strings(&["Zürich"]), strings(&["東京"])];
        let printer = TablePrinter::from_parts(&header, &rows);
        assert_eq!(printer.column_widths(), vec![6]);
        assert!(printer.render().contains("東京    \n"));
    }

    #[test]
    fn test_short_raw_rows_print_empty_cells() {
        let header = strings(&["a", "b"]);
        let rows = vec![strings(&["1"]), strings(&["2", "3", "ignored"])];
        let rendered = TablePrinter::from_parts(&header, &rows).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["a | b", "-------", "1 |  ", "2 | 3"]);
    }

    #[test]
    fn test_separator_width() {
        assert_eq!(separator_width(&[2, 5, 3]), 18);
        assert_eq!(separator_width(&[1]), 3);
        assert_eq!(separator_width(&[]), 0);
    }

    #[test]
    fn test_write_to_sink() {
        let header = strings(&["n"]);
        let rows = vec![strings(&["1"])];
        let mut sink = Vec::new();
        TablePrinter::from_parts(&header, &rows).write_to(&mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "n\n---\n1\n");
    }
}
