use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PdftabError {
    #[error("table extraction failed: {0}")]
    Extraction(String),

    #[error("{tool} not found. Install camelot (pip install camelot-py) or poppler (apt install poppler-utils)")]
    ToolNotFound { tool: String },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("row {row} has {found} cell(s), expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid page selection '{0}': expected 'all' or a comma-separated list of page numbers")]
    InvalidPages(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input pattern: {0}")]
    Glob(#[from] glob::PatternError),
}
