use std::path::Path;

use calamine::Reader;

use crate::error::CredexError;
use crate::model::IntermediateRecord;

/// Read intermediate field records back from a file written by the
/// extraction stage: `.csv`, `.xlsx`/`.ods` (the spreadsheet round-trip
/// between the two text-mode stages), or `.json`.
pub fn read_records(path: &Path) -> Result<Vec<IntermediateRecord>, CredexError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "ods" => read_workbook(path),
        "json" => {
            let bytes = std::fs::read(path)?;
            let records: Vec<IntermediateRecord> = serde_json::from_slice(&bytes)?;
            Ok(records)
        }
        other => Err(CredexError::UnsupportedFormat(format!(
            "records file must be .csv, .xlsx, .ods or .json (got '{other}')"
        ))),
    }
}

fn read_csv(path: &Path) -> Result<Vec<IntermediateRecord>, CredexError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        if let Some(rec) = parse_row(&cells) {
            records.push(rec);
        }
    }
    Ok(records)
}

fn read_workbook(path: &Path) -> Result<Vec<IntermediateRecord>, CredexError> {
    let mut workbook = calamine::open_workbook_auto(path).map_err(|e| CredexError::RecordsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CredexError::RecordsLoad {
            path: path.to_path_buf(),
            reason: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| CredexError::RecordsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::new();
    for row in sheet.rows() {
        let cells: Vec<String> = row.iter().map(cell_as_string).collect();
        if let Some(rec) = parse_row(&cells) {
            records.push(rec);
        }
    }
    Ok(records)
}

/// Turn one raw row into a record. Header echoes from spreadsheet
/// round-trips and rows with unparseable page numbers are dropped.
fn parse_row(cells: &[String]) -> Option<IntermediateRecord> {
    if cells.len() < 6 {
        return None;
    }

    let page_raw = cells[0].trim();
    let pan_raw = cells[1].trim();
    if page_raw.eq_ignore_ascii_case("name")
        || page_raw.eq_ignore_ascii_case("page")
        || pan_raw.eq_ignore_ascii_case("pan")
    {
        return None;
    }

    // Sheet readers may surface integer pages as "1.0"
    let page = page_raw.parse::<f64>().ok()?;
    if !page.is_finite() || page < 0.0 {
        return None;
    }

    Some(IntermediateRecord {
        page: page as usize,
        pan: pan_raw.to_string(),
        name: cells[2].trim().to_string(),
        score: cells[3].trim().to_string(),
        field: cells[4].trim().to_string(),
        value: cells[5].trim().to_string(),
    })
}

fn cell_as_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}
