use credex_core::error::CredexError;
use credex_core::extraction::tables_json;
use credex_core::{segment_tables, TableRules};
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, out: Option<PathBuf>) -> Result<(), CredexError> {
    let bytes = std::fs::read(&input_file)?;
    let pages = tables_json::read_tables(&bytes)?;
    let rows = segment_tables(&TableRules::default(), &pages);

    match out {
        Some(path) => {
            output::csv::write_capture_csv(&rows, &path)?;
            eprintln!(
                "Captured {} row(s), written to {}",
                rows.len(),
                path.display()
            );
        }
        None => {
            print!("{}", output::csv::capture_rows_to_string(&rows)?);
        }
    }
    Ok(())
}
