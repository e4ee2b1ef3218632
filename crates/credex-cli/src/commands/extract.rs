use credex_core::error::CredexError;
use credex_core::extraction::pdftotext::PdftotextExtractor;
use credex_core::model::IntermediateRecord;
use credex_core::TextRules;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    input_files: Vec<PathBuf>,
    output_format: &str,
    out_dir: Option<PathBuf>,
) -> Result<(), CredexError> {
    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir)?;
    }

    let extractor = PdftotextExtractor::new();
    let rules = TextRules::default();

    // One file's failure must not stop the rest of the batch
    let mut failed = 0usize;
    for path in &input_files {
        if let Err(e) = extract_one(path, &extractor, &rules, output_format, out_dir.as_deref()) {
            eprintln!("Error processing {}: {e}", path.display());
            failed += 1;
        }
    }
    if failed > 0 {
        eprintln!("{failed} of {} file(s) failed", input_files.len());
    }
    Ok(())
}

fn extract_one(
    path: &Path,
    extractor: &PdftotextExtractor,
    rules: &TextRules,
    output_format: &str,
    out_dir: Option<&Path>,
) -> Result<(), CredexError> {
    let pdf_bytes = std::fs::read(path)?;
    let records = credex_core::extract_text_records(&pdf_bytes, extractor, rules)?;

    match out_dir {
        Some(dir) => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("report");
            let out_path = dir.join(format!("{stem}_extract.csv"));
            output::csv::write_csv(&records, &out_path)?;
            eprintln!(
                "Extracted {} record(s) from {} to {}",
                records.len(),
                path.display(),
                out_path.display()
            );
        }
        None => {
            let rendered = render(&records, output_format)?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn render(records: &[IntermediateRecord], output_format: &str) -> Result<String, CredexError> {
    match output_format {
        "json" => output::json::to_string(&records),
        "csv" => output::csv::to_csv_string(records),
        _ => Ok(output::table::format_records(records)),
    }
}
