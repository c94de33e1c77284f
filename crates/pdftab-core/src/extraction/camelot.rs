use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::PdftabError;
use crate::extraction::{run_tool, tool_available, PageSelection, Strategy, TableExtractor};
use crate::model::RawGrid;

const EXPORT_STEM: &str = "tables";

/// Table extraction backend using the camelot command-line tool.
///
/// camelot exports one CSV per detected table as
/// `<stem>-page-<page>-table-<order>.csv`; the exports are written to a
/// temporary directory and read back in page, then table order.
pub struct CamelotExtractor {
    program: PathBuf,
}

impl CamelotExtractor {
    pub fn new() -> Self {
        CamelotExtractor {
            program: PathBuf::from("camelot"),
        }
    }

    /// Check if camelot is available on the system.
    pub fn is_available() -> bool {
        tool_available("camelot", "--version")
    }
}

impl Default for CamelotExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for CamelotExtractor {
    fn extract(
        &self,
        pdf_path: &Path,
        pages: &PageSelection,
        strategy: Strategy,
    ) -> Result<Vec<RawGrid>, PdftabError> {
        let export_dir = tempfile::tempdir()
            .map_err(|e| PdftabError::Extraction(format!("cannot create temp dir: {e}")))?;
        let target = export_dir.path().join(format!("{EXPORT_STEM}.csv"));

        run_tool(
            "camelot",
            Command::new(&self.program)
                .arg("--pages")
                .arg(pages.to_string())
                .arg("--format")
                .arg("csv")
                .arg("--output")
                .arg(&target)
                .arg(strategy.as_str())
                .arg(pdf_path),
        )?;

        let mut exports = Vec::new();
        for entry in std::fs::read_dir(export_dir.path())? {
            let path = entry?.path();
            let key = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_export_name);
            if let Some(key) = key {
                exports.push((key, path));
            }
        }
        exports.sort_by_key(|(key, _)| *key);

        let mut grids = Vec::with_capacity(exports.len());
        for ((page, order), path) in exports {
            let bytes = std::fs::read(&path)?;
            let grid = parse_csv(&bytes)?;
            debug!(page, order, rows = grid.height(), cols = grid.width(), "read camelot export");
            grids.push(grid);
        }

        Ok(grids)
    }

    fn backend_name(&self) -> &str {
        "camelot"
    }
}

/// `(page, order)` of a camelot export file name, or `None` for other files.
fn parse_export_name(name: &str) -> Option<(usize, usize)> {
    let rest = name
        .strip_prefix(EXPORT_STEM)?
        .strip_prefix("-page-")?
        .strip_suffix(".csv")?;
    let (page, order) = rest.split_once("-table-")?;
    Some((page.parse().ok()?, order.parse().ok()?))
}

/// Read a headerless CSV export into a raw grid.
fn parse_csv(bytes: &[u8]) -> Result<RawGrid, PdftabError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Ok(RawGrid::from_text(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_names_sort_by_page_then_order() {
        let mut names = vec![
            "tables-page-10-table-1.csv",
            "tables-page-2-table-2.csv",
            "tables-page-2-table-1.csv",
        ];
        names.sort_by_key(|n| parse_export_name(n));
        assert_eq!(
            names,
            vec![
                "tables-page-2-table-1.csv",
                "tables-page-2-table-2.csv",
                "tables-page-10-table-1.csv",
            ]
        );
    }

    #[test]
    fn foreign_files_are_ignored() {
        assert_eq!(parse_export_name("tables.csv"), None);
        assert_eq!(parse_export_name("tables-page-1-table-1.json"), None);
        assert_eq!(parse_export_name("other-page-1-table-1.csv"), None);
        assert_eq!(parse_export_name("tables-page-3-table-4.csv"), Some((3, 4)));
    }

    #[test]
    fn csv_export_becomes_ragged_grid() {
        let csv = b"\"Date\",\"Details\",\"Balance\"\n\"01/02\",\"Rent, March\",\"\"\n\"02/02\"\n";
        let grid = parse_csv(csv).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(1, 1), Some("Rent, March"));
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.rows()[2].len(), 1);
    }
}
