use credex_core::detect_layout;
use credex_core::error::CredexError;
use credex_core::extraction::pdftotext::PdftotextExtractor;
use credex_core::extraction::{tables_json, PdfExtractor};
use std::path::PathBuf;

pub fn run(input_file: PathBuf) -> Result<(), CredexError> {
    let is_json = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let kind = if is_json {
        let bytes = std::fs::read(&input_file)?;
        let tables = tables_json::read_tables(&bytes)?;
        detect_layout(&tables, &[])
    } else {
        let pdf_bytes = std::fs::read(&input_file)?;
        let extractor = PdftotextExtractor::new();
        let pages = extractor.extract_pages(&pdf_bytes)?;
        detect_layout(&[], &pages)
    };

    println!("{kind}");
    Ok(())
}
