pub mod convert;
pub mod inspect;

use pdftab_core::extraction::camelot::CamelotExtractor;
use pdftab_core::extraction::pdftotext::PdftotextExtractor;
use pdftab_core::TableExtractor;

/// Backend named on the command line, or the best installed one.
pub fn extractor(backend: Option<&str>) -> Box<dyn TableExtractor> {
    match backend {
        Some("camelot") => Box::new(CamelotExtractor::new()),
        Some("pdftotext") => Box::new(PdftotextExtractor::new()),
        _ => pdftab_core::default_extractor(),
    }
}
