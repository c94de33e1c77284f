use pdftab_core::error::PdftabError;
use pdftab_core::{BatchConfig, NormalizerKind, PageSelection};
use std::path::PathBuf;
use tracing::info;

pub fn run(
    input_dir: PathBuf,
    output_dir: PathBuf,
    report_file: Option<PathBuf>,
    backend: Option<&str>,
    pages: &str,
    kind: NormalizerKind,
) -> Result<(), PdftabError> {
    let config = BatchConfig {
        input_dir,
        output_dir,
        pages: pages.parse::<PageSelection>()?,
    };
    let extractor = super::extractor(backend);

    let report = pdftab_core::run_batch(&config, extractor.as_ref(), &kind)?;

    if !report.files.is_empty() {
        info!(
            "Done: {} written, {} skipped, {} failed",
            report.written(),
            report.skipped(),
            report.failed()
        );
    }

    if let Some(path) = report_file {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
