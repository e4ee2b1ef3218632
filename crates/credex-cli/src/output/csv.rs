use std::path::Path;

use credex_core::error::CredexError;
use serde::Serialize;

/// Serialize rows to CSV text, header row included.
pub fn to_csv_string<T: Serialize>(rows: &[T]) -> Result<String, CredexError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| CredexError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write rows to a CSV file, header row included.
pub fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<(), CredexError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Capture rows are ragged; write them with a flexible writer. Separator
/// rows come out as a single empty cell, which the mapper ignores.
pub fn capture_rows_to_string(rows: &[Vec<String>]) -> Result<String, CredexError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    write_capture_rows(&mut wtr, rows)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| CredexError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write capture rows to a CSV file.
pub fn write_capture_csv(rows: &[Vec<String>], path: &Path) -> Result<(), CredexError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    write_capture_rows(&mut wtr, rows)?;
    wtr.flush()?;
    Ok(())
}

fn write_capture_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    rows: &[Vec<String>],
) -> Result<(), CredexError> {
    for row in rows {
        if row.is_empty() {
            wtr.write_record([""])?;
        } else {
            wtr.write_record(row)?;
        }
    }
    Ok(())
}
