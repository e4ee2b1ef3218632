use credex_core::build_facilities;
use credex_core::error::CredexError;
use credex_core::extraction::records_sheet;
use credex_core::model::FacilityRecord;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    out: Option<PathBuf>,
) -> Result<(), CredexError> {
    let records = records_sheet::read_records(&input_file)?;
    let facilities = build_facilities(&records);

    match out {
        Some(path) => {
            if output_format == "json" {
                std::fs::write(&path, output::json::to_string(&facilities)?)?;
            } else {
                output::csv::write_csv(&facilities, &path)?;
            }
            eprintln!(
                "Built {} facility row(s), written to {}",
                facilities.len(),
                path.display()
            );
        }
        None => {
            let rendered = render(&facilities, output_format)?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn render(facilities: &[FacilityRecord], output_format: &str) -> Result<String, CredexError> {
    match output_format {
        "json" => output::json::to_string(&facilities),
        "csv" => output::csv::to_csv_string(facilities),
        _ => Ok(output::table::format_facilities(facilities)),
    }
}
