pub mod pdftotext;
pub mod records_sheet;
pub mod tables_json;

use serde::{Deserialize, Serialize};

use crate::error::CredexError;

/// Text content extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Tables extracted from a single page by an external table reader.
/// Each table is a row-major grid of cell strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTables {
    pub page_number: usize,
    pub tables: Vec<Vec<Vec<String>>>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, CredexError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
