pub mod batch;
pub mod error;
pub mod extraction;
pub mod model;
pub mod normalize;

pub use batch::{convert_pdf, run_batch, BatchConfig, BatchReport, Conversion, FileOutcome};
pub use error::PdftabError;
pub use extraction::{PageSelection, Strategy, TableExtractor};
pub use model::{Field, NormalizedTable, RawGrid};
pub use normalize::{NormalizerKind, TableNormalizer, TableOutcome};

use extraction::camelot::CamelotExtractor;
use extraction::pdftotext::PdftotextExtractor;

/// Pick the best installed extraction backend.
///
/// camelot supports both lattice and stream detection and is preferred;
/// pdftotext only supports stream detection.
pub fn default_extractor() -> Box<dyn TableExtractor> {
    if CamelotExtractor::is_available() {
        Box::new(CamelotExtractor::new())
    } else {
        Box::new(PdftotextExtractor::new())
    }
}
