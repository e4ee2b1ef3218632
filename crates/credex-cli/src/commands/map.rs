use credex_core::error::CredexError;
use credex_core::map_capture_rows;
use credex_core::model::MappedFacilityRecord;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    out: Option<PathBuf>,
) -> Result<(), CredexError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&input_file)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    let mapped = map_capture_rows(&rows);

    match out {
        Some(path) => {
            if output_format == "json" {
                std::fs::write(&path, output::json::to_string(&mapped)?)?;
            } else {
                output::csv::write_csv(&mapped, &path)?;
            }
            eprintln!(
                "Mapped {} facility row(s), written to {}",
                mapped.len(),
                path.display()
            );
        }
        None => {
            let rendered = render(&mapped, output_format)?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn render(mapped: &[MappedFacilityRecord], output_format: &str) -> Result<String, CredexError> {
    match output_format {
        "json" => output::json::to_string(&mapped),
        "csv" => output::csv::to_csv_string(mapped),
        _ => Ok(output::table::format_mapped(mapped)),
    }
}
