use pdftab_core::error::PdftabError;
use pdftab_core::{Conversion, NormalizerKind, PageSelection};
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    mode: &str,
    output_format: &str,
    backend: Option<&str>,
    pages: &str,
) -> Result<(), PdftabError> {
    let kind = match mode {
        "tables" => NormalizerKind::Generic,
        _ => NormalizerKind::Statement,
    };
    let pages: PageSelection = pages.parse()?;
    let extractor = super::extractor(backend);

    match pdftab_core::convert_pdf(&pdf_file, extractor.as_ref(), &kind, &pages)? {
        Conversion::Table(table) => match output_format {
            "json" => output::json::print(&table)?,
            _ => output::table::print(&table),
        },
        Conversion::NoTables => eprintln!(
            "No tables found in {} with either method",
            pdf_file.display()
        ),
        Conversion::NoData => eprintln!("No table data found in {}", pdf_file.display()),
    }

    Ok(())
}
