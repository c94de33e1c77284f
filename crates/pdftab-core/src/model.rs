use serde::Serialize;
use std::fmt;

use crate::error::PdftabError;

/// Missing-value marker some extraction engines emit for empty cells.
pub const MISSING_MARKER: &str = "nan";

/// A raw table as produced by an extraction backend.
///
/// Rows may be ragged; a short row behaves as if padded with missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        RawGrid { rows }
    }

    /// Build a grid from plain text cells. Empty strings become missing cells.
    pub fn from_text<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell: String = cell.into();
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell)
                        }
                    })
                    .collect()
            })
            .collect();
        RawGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (length of the longest row).
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical bank-statement fields, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Date,
    Details,
    Credits,
    Debits,
    Balance,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Date,
        Field::Details,
        Field::Credits,
        Field::Debits,
        Field::Balance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Details => "Details",
            Field::Credits => "Credits",
            Field::Debits => "Debits",
            Field::Balance => "Balance",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cleaned table: named columns, every row exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PdftabError> {
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(PdftabError::RaggedTable {
                row,
                expected: columns.len(),
                found: r.len(),
            });
        }
        Ok(NormalizedTable { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Concatenate tables in order, aligning them by column name.
    ///
    /// The result's columns are the union of all input columns in first-seen
    /// order. Cells a table has no column for are filled with `""`. Rows whose
    /// every cell is empty are dropped.
    pub fn concat(tables: &[NormalizedTable]) -> NormalizedTable {
        let mut columns: Vec<String> = Vec::new();
        for table in tables {
            for col in &table.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let positions: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in &table.rows {
                let out: Vec<String> = positions
                    .iter()
                    .map(|p| p.map(|i| row[i].clone()).unwrap_or_default())
                    .collect();
                if out.iter().any(|v| !v.is_empty()) {
                    rows.push(out);
                }
            }
        }

        NormalizedTable { columns, rows }
    }

    /// Render the header and the first `limit` rows as an aligned text block.
    pub fn preview(&self, limit: usize) -> String {
        let shown = &self.rows[..self.rows.len().min(limit)];
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                shown
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format_line(&self.columns, &widths));
        for row in shown {
            out.push('\n');
            out.push_str(&format_line(row, &widths));
        }
        out
    }

    /// Serialize the table as CSV (header row, no index column).
    pub fn to_csv(&self) -> Result<Vec<u8>, PdftabError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| PdftabError::Io(e.into_error()))
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:>width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> NormalizedTable {
        NormalizedTable::new(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = NormalizedTable::new(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PdftabError::RaggedTable {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn serializes_as_columns_and_rows() {
        let t = table(&["A", "B"], &[&["1", "2"]]);
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            serde_json::json!({"columns": ["A", "B"], "rows": [["1", "2"]]})
        );
    }

    #[test]
    fn raw_grid_width_uses_longest_row() {
        let grid = RawGrid::from_text(vec![vec!["a"], vec!["b", "c", ""]]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(1, 1), Some("c"));
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.cell(0, 2), None);
    }

    #[test]
    fn concat_aligns_columns_and_drops_empty_rows() {
        let a = table(&["Column_1", "Column_2"], &[&["a", "b"], &["", ""]]);
        let b = table(
            &["Column_1", "Column_2", "Column_3"],
            &[&["c", "d", "e"]],
        );
        let all = NormalizedTable::concat(&[a, b]);
        assert_eq!(all.columns(), ["Column_1", "Column_2", "Column_3"]);
        assert_eq!(all.len(), 2);
        assert_eq!(all.rows()[0], ["a", "b", ""]);
        assert_eq!(all.value(1, "Column_3"), Some("e"));
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let t = table(&["Date", "Details"], &[&["01/02", "Coffee, large"]]);
        let csv = String::from_utf8(t.to_csv().unwrap()).unwrap();
        assert_eq!(csv, "Date,Details\n01/02,\"Coffee, large\"\n");
    }

    #[test]
    fn preview_limits_rows() {
        let t = table(&["A"], &[&["1"], &["2"], &["3"]]);
        assert_eq!(t.preview(2), "A\n1\n2");
    }
}
