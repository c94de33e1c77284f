use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::PdftabError;
use crate::extraction::{run_tool, tool_available, PageSelection, Strategy, TableExtractor};
use crate::model::RawGrid;

/// Blank columns needed between two text runs for them to count as separate cells.
const MIN_COLUMN_GAP: usize = 2;

/// Table extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment and detects
/// tables as runs of lines with at least two aligned cells. Only the stream
/// strategy is supported; lattice finds nothing since the layout text
/// carries no ruling lines.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        tool_available("pdftotext", "-v")
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for PdftotextExtractor {
    fn extract(
        &self,
        pdf_path: &Path,
        pages: &PageSelection,
        strategy: Strategy,
    ) -> Result<Vec<RawGrid>, PdftabError> {
        if strategy == Strategy::Lattice {
            debug!("pdftotext has no ruling-line detection, lattice yields no tables");
            return Ok(Vec::new());
        }

        let stdout = run_tool(
            "pdftotext",
            Command::new("pdftotext")
                .arg("-layout")
                .arg(pdf_path)
                .arg("-"), // output to stdout
        )?;
        let text = String::from_utf8_lossy(&stdout);

        Ok(find_layout_tables(&text, pages))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Find whitespace-aligned tables in `pdftotext -layout` output.
///
/// Pages are separated by form feeds. A table is a run of two or more
/// consecutive lines that each split into at least two cells.
pub fn find_layout_tables(text: &str, pages: &PageSelection) -> Vec<RawGrid> {
    let mut grids = Vec::new();

    for (i, page_text) in text.split('\x0c').enumerate() {
        if !pages.includes(i + 1) {
            continue;
        }

        let mut block: Vec<&str> = Vec::new();
        for line in page_text.lines() {
            if cell_count(line) >= 2 {
                block.push(line);
                continue;
            }
            if block.len() >= 2 {
                grids.push(block_to_grid(&block));
            }
            block.clear();
        }
        if block.len() >= 2 {
            grids.push(block_to_grid(&block));
        }
    }

    grids
}

/// Number of text runs separated by at least `MIN_COLUMN_GAP` spaces.
fn cell_count(line: &str) -> usize {
    spans(&occupancy(&[line])).len()
}

fn block_to_grid(lines: &[&str]) -> RawGrid {
    let columns = spans(&occupancy(lines));
    let rows = lines
        .iter()
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            columns
                .iter()
                .map(|&(start, end)| {
                    let end = end.min(chars.len());
                    if start >= end {
                        return None;
                    }
                    let cell: String = chars[start..end].iter().collect();
                    let cell = cell.trim();
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect()
        })
        .collect();
    RawGrid::new(rows)
}

/// For every character column, whether any line has a non-space character there.
fn occupancy(lines: &[&str]) -> Vec<bool> {
    let mut occupied = Vec::new();
    for line in lines {
        for (i, c) in line.chars().enumerate() {
            if i >= occupied.len() {
                occupied.resize(i + 1, false);
            }
            if !c.is_whitespace() {
                occupied[i] = true;
            }
        }
    }
    occupied
}

/// `[start, end)` character ranges of occupied runs, merging gaps narrower than `MIN_COLUMN_GAP`.
fn spans(occupied: &[bool]) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < occupied.len() {
        if !occupied[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < occupied.len() && occupied[i] {
            i += 1;
        }
        if let Some(last) = out.last_mut() {
            if start - last.1 < MIN_COLUMN_GAP {
                last.1 = i;
                continue;
            }
        }
        out.push((start, i));
    }
    out
}
