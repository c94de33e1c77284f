use crate::error::PdftabError;
use crate::model::{NormalizedTable, RawGrid};
use crate::normalize::{clean_cell, positional_label, prune, TableOutcome};

/// Normalize a raw grid without any semantic inference.
///
/// Blank rows and columns are dropped, the remaining columns are named
/// `Column_1 .. Column_N`, and every cell is trimmed.
pub fn normalize(grid: &RawGrid) -> TableOutcome {
    TableOutcome::from(try_normalize(grid))
}

fn try_normalize(grid: &RawGrid) -> Result<Option<NormalizedTable>, PdftabError> {
    let rows = prune(grid);
    if rows.is_empty() {
        return Ok(None);
    }

    let width = rows[0].len();
    let columns = (0..width).map(positional_label).collect();
    let cleaned = rows
        .iter()
        .map(|row| row.iter().map(|c| clean_cell(c.as_deref())).collect())
        .collect();

    NormalizedTable::new(columns, cleaned).map(Some)
}
