use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::PdftabError;
use crate::extraction::{extract_tables, PageSelection, TableExtractor};
use crate::model::NormalizedTable;
use crate::normalize::{TableNormalizer, TableOutcome};

/// Rows shown in the success preview.
pub const PREVIEW_ROWS: usize = 5;

/// Where the batch reads PDFs from and writes CSVs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pages: PageSelection,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input_dir: PathBuf::from("./pdfs"),
            output_dir: PathBuf::from("./csv"),
            pages: PageSelection::All,
        }
    }
}

/// Result of extracting and normalizing every table of one PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Neither strategy found a table.
    NoTables,
    /// Tables were found but none produced rows.
    NoData,
    /// All tables concatenated in discovery order.
    Table(NormalizedTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoTables,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Written { output: PathBuf, rows: usize },
    Skipped(SkipReason),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of a batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Every `*.pdf` directly inside `input_dir`, sorted by path. Hidden files
/// such as `._statement.pdf` are not inputs.
pub fn find_inputs(input_dir: &Path) -> Result<Vec<PathBuf>, PdftabError> {
    let escaped = glob::Pattern::escape(&input_dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.pdf");
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let mut inputs: Vec<PathBuf> = glob::glob_with(&pattern.to_string_lossy(), options)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// Convert every PDF in the input directory, writing one CSV per file.
///
/// Per-file problems are recorded in the report and never stop the batch.
/// Only an invalid input pattern or an uncreatable output directory is an
/// error.
pub fn run_batch(
    config: &BatchConfig,
    extractor: &dyn TableExtractor,
    normalizer: &dyn TableNormalizer,
) -> Result<BatchReport, PdftabError> {
    let inputs = find_inputs(&config.input_dir)?;
    if inputs.is_empty() {
        info!("No PDF files found in the {} directory", config.input_dir.display());
        info!(
            "Please place your PDF files in the {} directory",
            config.input_dir.display()
        );
        return Ok(BatchReport::default());
    }

    info!(
        backend = extractor.backend_name(),
        normalizer = normalizer.name(),
        "Found {} PDF file(s) to process",
        inputs.len()
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|source| PdftabError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut report = BatchReport::default();
    for input in inputs {
        info!("Processing: {}", input.display());
        let outcome = process_file(&input, config, extractor, normalizer);
        report.files.push(FileReport { input, outcome });
    }

    Ok(report)
}

/// Extract and normalize the tables of a single PDF.
pub fn convert_pdf(
    pdf_path: &Path,
    extractor: &dyn TableExtractor,
    normalizer: &dyn TableNormalizer,
    pages: &PageSelection,
) -> Result<Conversion, PdftabError> {
    let (strategy, grids) = extract_tables(extractor, pdf_path, pages)?;
    if grids.is_empty() {
        return Ok(Conversion::NoTables);
    }
    info!(%strategy, "Found {} table(s)", grids.len());

    let mut tables = Vec::new();
    for (i, grid) in grids.iter().enumerate() {
        let table_num = i + 1;
        info!(
            table = table_num,
            "Table {} shape: ({}, {})",
            table_num,
            grid.height(),
            grid.width()
        );

        match normalizer.normalize(grid) {
            TableOutcome::Data(table) => tables.push(table),
            TableOutcome::Empty => debug!(table = table_num, "table produced no rows"),
            TableOutcome::Failed(reason) => {
                error!(table = table_num, "Error processing table {}: {}", table_num, reason)
            }
        }
    }

    if tables.is_empty() {
        return Ok(Conversion::NoData);
    }
    let combined = NormalizedTable::concat(&tables);
    if combined.is_empty() {
        return Ok(Conversion::NoData);
    }
    Ok(Conversion::Table(combined))
}

fn process_file(
    input: &Path,
    config: &BatchConfig,
    extractor: &dyn TableExtractor,
    normalizer: &dyn TableNormalizer,
) -> FileOutcome {
    let conversion = match convert_pdf(input, extractor, normalizer, &config.pages) {
        Ok(conversion) => conversion,
        Err(e) => return failed(input, e),
    };

    match conversion {
        Conversion::NoTables => {
            warn!("No tables found in {} with either method", input.display());
            FileOutcome::Skipped(SkipReason::NoTables)
        }
        Conversion::NoData => {
            warn!("No table data found in {}", input.display());
            FileOutcome::Skipped(SkipReason::NoData)
        }
        Conversion::Table(table) => match write_csv(&table, input, &config.output_dir) {
            Ok(output) => {
                log_success(&table, &output);
                FileOutcome::Written {
                    output,
                    rows: table.len(),
                }
            }
            Err(e) => failed(input, e),
        },
    }
}

fn failed(input: &Path, e: PdftabError) -> FileOutcome {
    error!("Error processing {}: {}", input.display(), e);
    FileOutcome::Failed {
        error: e.to_string(),
    }
}

/// Output path for `input`: `{stem}.csv` inside `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path) -> Result<PathBuf, PdftabError> {
    let stem = input.file_stem().ok_or_else(|| {
        PdftabError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", input.display()),
        ))
    })?;
    let mut name = stem.to_os_string();
    name.push(".csv");
    Ok(output_dir.join(name))
}

/// Write the table as CSV. The file is written in one call once fully rendered.
fn write_csv(
    table: &NormalizedTable,
    input: &Path,
    output_dir: &Path,
) -> Result<PathBuf, PdftabError> {
    let output = output_path(input, output_dir)?;
    let bytes = table.to_csv()?;
    std::fs::write(&output, bytes)?;
    Ok(output)
}

fn log_success(table: &NormalizedTable, output: &Path) {
    info!("Successfully saved data to {}", output.display());
    info!("Extracted {} rows", table.len());
    info!("Preview of extracted data:\n{}", table.preview(PREVIEW_ROWS));
}
