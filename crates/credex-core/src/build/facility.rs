//! Second pass over the intermediate record stream: group rows into one
//! record per facility, merge value continuations, resolve field aliases,
//! and back-fill pages that produced no fields.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{FacilityRecord, IntermediateRecord, PageContext};

/// DPD values sometimes arrive with their section header glued on; these
/// prefixes are stripped longest-first before assignment.
const DPD_VALUE_PREFIXES: [&str; 3] = [
    "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)",
    "DAYS PAST DUE/ASSET CLASSIFICATION",
    "DPD:",
];

/// Build the final facility table from the intermediate record stream.
///
/// A `Type` field opens a new facility, finalizing any open one. Rows with
/// a blank field are continuations of the page's most recent field value.
/// Every page seen in the stream appears in the output at least once,
/// via a placeholder when it produced no facilities. Output is sorted
/// ascending by page (stable), with empty fields normalized to "No Data".
pub fn build_facilities(records: &[IntermediateRecord]) -> Vec<FacilityRecord> {
    let rows = merge_continuations(records);

    let mut facilities: Vec<FacilityRecord> = Vec::new();
    let mut current: Option<FacilityRecord> = None;

    for row in &rows {
        if row.field == "TYPE" {
            if let Some(done) = current.take() {
                facilities.push(done);
            }
            current = Some(FacilityRecord {
                name: row.name.clone(),
                pan: row.pan.clone(),
                score: row.score.clone(),
                facility_type: row.value.clone(),
                page: row.page,
                ..Default::default()
            });
        } else if let Some(facility) = current.as_mut() {
            match row.field.as_str() {
                "SANCTIONED" => facility.sanction_limit = row.value.clone(),
                "HIGH CREDIT" => {
                    // Alias fallback only; a real Sanctioned value wins
                    if facility.sanction_limit.is_empty() {
                        facility.sanction_limit = row.value.clone();
                    }
                }
                "CURRENT BALANCE" => facility.outstanding = row.value.clone(),
                "DPD" => facility.dpds = strip_dpd_prefix(&row.value),
                "OWNERSHIP" => facility.ownership = row.value.clone(),
                "OVERDUE" => facility.overdue = row.value.clone(),
                _ => {}
            }
        }
    }
    if let Some(done) = current.take() {
        facilities.push(done);
    }

    // Back-fill pages that yielded no facility so page coverage holds
    let contexts = page_contexts(records);
    let pages_with_data: HashSet<usize> = facilities.iter().map(|f| f.page).collect();
    for (page, ctx) in &contexts {
        if !pages_with_data.contains(page) {
            facilities.push(FacilityRecord::placeholder(*page, ctx));
        }
    }

    facilities.sort_by_key(|f| f.page);
    for facility in &mut facilities {
        facility.fill_no_data();
    }

    facilities
}

/// First pass: stamp every row with its page's cached borrower metadata
/// and fold blank-field rows into the preceding field value on the same
/// page. Blank-field rows with no prior field on their page are dropped.
fn merge_continuations(records: &[IntermediateRecord]) -> Vec<IntermediateRecord> {
    let mut contexts: BTreeMap<usize, PageContext> = BTreeMap::new();
    let mut last_field_per_page: HashMap<usize, String> = HashMap::new();
    let mut rows: Vec<IntermediateRecord> = Vec::new();

    for rec in records {
        let ctx = contexts.entry(rec.page).or_default();
        ctx.absorb(rec.pan.trim(), rec.name.trim(), rec.score.trim());
        let (pan, name, score) = (ctx.pan.clone(), ctx.name.clone(), ctx.score.clone());

        let field = canonical_field(&rec.field);
        let value = rec.value.trim().to_string();

        if field.is_empty() {
            // Continuation; silently discarded when the page has no prior field
            if let Some(last_field) = last_field_per_page.get(&rec.page) {
                for row in rows.iter_mut().rev() {
                    if row.page == rec.page && row.field == *last_field {
                        row.value = format!("{} {}", row.value, value);
                        break;
                    }
                }
            }
            continue;
        }

        last_field_per_page.insert(rec.page, field.clone());
        rows.push(IntermediateRecord {
            page: rec.page,
            pan,
            name,
            score,
            field,
            value,
        });
    }

    rows
}

/// The per-page borrower metadata cache over the whole stream; non-empty
/// values overwrite, empty ones never do.
fn page_contexts(records: &[IntermediateRecord]) -> BTreeMap<usize, PageContext> {
    let mut contexts: BTreeMap<usize, PageContext> = BTreeMap::new();
    for rec in records {
        contexts
            .entry(rec.page)
            .or_default()
            .absorb(rec.pan.trim(), rec.name.trim(), rec.score.trim());
    }
    contexts
}

fn canonical_field(field: &str) -> String {
    field
        .trim()
        .to_uppercase()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn strip_dpd_prefix(value: &str) -> String {
    let upper = value.to_uppercase();
    for prefix in DPD_VALUE_PREFIXES {
        if upper.starts_with(prefix) {
            return value.get(prefix.len()..).unwrap_or("").trim().to_string();
        }
    }
    value.to_string()
}
