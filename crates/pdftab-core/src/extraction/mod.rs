pub mod camelot;
pub mod pdftotext;

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use tracing::info;

use crate::error::PdftabError;
use crate::model::RawGrid;

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Tables delimited by ruling lines.
    Lattice,
    /// Tables inferred from whitespace alignment.
    Stream,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Lattice => "lattice",
            Strategy::Stream => "stream",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pages to extract tables from. Page numbers are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum PageSelection {
    #[default]
    All,
    Pages(Vec<usize>),
}

impl PageSelection {
    pub fn includes(&self, page: usize) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelection::All => write!(f, "all"),
            PageSelection::Pages(pages) => {
                let list: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", list.join(","))
            }
        }
    }
}

impl FromStr for PageSelection {
    type Err = PdftabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }
        let pages = s
            .split(',')
            .map(|p| match p.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(PdftabError::InvalidPages(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageSelection::Pages(pages))
    }
}

/// Trait for table extraction backends.
pub trait TableExtractor {
    /// Extract every table found with `strategy`, in discovery order.
    fn extract(
        &self,
        pdf_path: &Path,
        pages: &PageSelection,
        strategy: Strategy,
    ) -> Result<Vec<RawGrid>, PdftabError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Extract tables with the lattice strategy, falling back to stream when it finds none.
///
/// Returns the strategy that produced the grids along with them.
pub fn extract_tables(
    extractor: &dyn TableExtractor,
    pdf_path: &Path,
    pages: &PageSelection,
) -> Result<(Strategy, Vec<RawGrid>), PdftabError> {
    let grids = extractor.extract(pdf_path, pages, Strategy::Lattice)?;
    if !grids.is_empty() {
        return Ok((Strategy::Lattice, grids));
    }

    info!(
        file = %pdf_path.display(),
        "no tables found with lattice method, trying stream method"
    );
    let grids = extractor.extract(pdf_path, pages, Strategy::Stream)?;
    Ok((Strategy::Stream, grids))
}

/// Run an external tool, mapping spawn and exit failures to `PdftabError`.
pub(crate) fn run_tool(tool: &str, command: &mut Command) -> Result<Vec<u8>, PdftabError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PdftabError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            PdftabError::Extraction(format!("{tool} failed: {e}"))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(PdftabError::ToolFailed {
            tool: tool.to_string(),
            code,
            stderr,
        });
    }

    Ok(output.stdout)
}

/// Check whether a tool can be spawned.
pub(crate) fn tool_available(tool: &str, version_arg: &str) -> bool {
    Command::new(tool)
        .arg(version_arg)
        .output()
        .map(|o| o.status.success() || !o.stderr.is_empty())
        .unwrap_or(false)
}
