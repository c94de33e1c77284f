pub mod generic;
pub mod statement;

use serde::Serialize;

use crate::error::PdftabError;
use crate::model::{NormalizedTable, RawGrid, MISSING_MARKER};

/// Result of normalizing one raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// The table produced at least one row.
    Data(NormalizedTable),
    /// Nothing usable survived cleaning.
    Empty,
    /// Normalization failed; the reason is for logging.
    Failed(String),
}

impl From<Result<Option<NormalizedTable>, PdftabError>> for TableOutcome {
    fn from(result: Result<Option<NormalizedTable>, PdftabError>) -> Self {
        match result {
            Ok(Some(table)) if !table.is_empty() => TableOutcome::Data(table),
            Ok(_) => TableOutcome::Empty,
            Err(e) => TableOutcome::Failed(e.to_string()),
        }
    }
}

/// Turns one raw grid into a normalized table.
///
/// The batch driver is written against this trait so any cleaning policy
/// can be plugged in; [`NormalizerKind`] covers the two built-in ones.
pub trait TableNormalizer {
    fn normalize(&self, grid: &RawGrid) -> TableOutcome;

    /// Short name used in log fields.
    fn name(&self) -> &str;
}

/// Which built-in normalizer the batch driver applies to every extracted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerKind {
    /// Positional `Column_N` names, no semantic mapping.
    Generic,
    /// Canonical `Date, Details, Credits, Debits, Balance` schema.
    Statement,
}

impl TableNormalizer for NormalizerKind {
    fn normalize(&self, grid: &RawGrid) -> TableOutcome {
        match self {
            NormalizerKind::Generic => generic::normalize(grid),
            NormalizerKind::Statement => statement::normalize(grid),
        }
    }

    fn name(&self) -> &str {
        match self {
            NormalizerKind::Generic => "generic",
            NormalizerKind::Statement => "statement",
        }
    }
}

/// A cell counts as blank if it is missing, whitespace, or the missing-value marker.
pub fn is_blank(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(s) => {
            let t = s.trim();
            t.is_empty() || t == MISSING_MARKER
        }
    }
}

/// Trimmed cell text, with blank cells mapped to `""`.
pub fn clean_cell(cell: Option<&str>) -> String {
    if is_blank(cell) {
        String::new()
    } else {
        cell.map(|s| s.trim().to_string()).unwrap_or_default()
    }
}

pub(crate) fn positional_label(index: usize) -> String {
    format!("Column_{}", index + 1)
}

/// Drop blank rows, then blank columns. Returns a rectangular grid.
pub(crate) fn prune(grid: &RawGrid) -> Vec<Vec<Option<String>>> {
    let width = grid.width();
    let rows: Vec<&Vec<Option<String>>> = grid
        .rows()
        .iter()
        .filter(|row| row.iter().any(|c| !is_blank(c.as_deref())))
        .collect();

    let keep: Vec<usize> = (0..width)
        .filter(|&j| {
            rows.iter()
                .any(|row| !is_blank(row.get(j).and_then(|c| c.as_deref())))
        })
        .collect();

    rows.into_iter()
        .map(|row| {
            keep.iter()
                .map(|&j| row.get(j).cloned().flatten())
                .collect()
        })
        .collect()
}
