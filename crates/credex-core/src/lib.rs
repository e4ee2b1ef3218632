pub mod build;
pub mod config;
pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod segment;

pub use build::facility::build_facilities;
pub use build::table_map::map_capture_rows;
pub use config::{TableRules, TextRules};
pub use layout::detect_layout;
pub use segment::table::segment_tables;

use error::CredexError;
use extraction::PdfExtractor;
use model::{FacilityRecord, IntermediateRecord};

/// Text-mode pipeline, first stage: PDF bytes → intermediate field records.
///
/// The extractor hands over raw page text; the core normalizes it into the
/// ordered line stream and segments per-facility fields out of it. An
/// unreadable document surfaces as the extractor's error; keyword-free
/// content yields placeholder records, never a failure.
pub fn extract_text_records(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    rules: &TextRules,
) -> Result<Vec<IntermediateRecord>, CredexError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let lines = segment::normalize::normalize_pages(rules, &pages);
    Ok(segment::text::extract_records(rules, &lines))
}

/// Text-mode pipeline, both stages: PDF bytes → final facility table.
pub fn extract_facilities(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    rules: &TextRules,
) -> Result<Vec<FacilityRecord>, CredexError> {
    let records = extract_text_records(pdf_bytes, extractor, rules)?;
    Ok(build_facilities(&records))
}
