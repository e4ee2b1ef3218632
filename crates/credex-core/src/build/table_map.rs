//! Table-mode second stage: map keyword-tagged capture rows onto the
//! destination facility columns.
//!
//! The capture rows carry no record delimiters; each destination column is
//! harvested independently as an ordered list and the lists are zipped by
//! index, padded with empties to the longest facility-bearing list.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::MappedFacilityRecord;

static RANK_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^rank:?$").expect("hard-coded pattern"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Name\s*[:\-]?\s*(.+)").expect("hard-coded pattern"));
static PAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PAN\s*[:\-]?\s*([A-Z]{5}\d{4}[A-Z])").expect("hard-coded pattern")
});
static CF_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Credit Facility\s*\d+").expect("hard-coded pattern"));
static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Type\s*[:\-/_]?\s*(.+)").expect("hard-coded pattern"));
static ASSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Asset Classification / DPD\s*[:\-/_]?\s*(.+)").expect("hard-coded pattern")
});
static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Credit Facility Details\s*[:\-/_]?\s*(.+)").expect("hard-coded pattern")
});
static OUTSTANDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Outstanding Balance\s*[:\-/_]?\s*(.+)").expect("hard-coded pattern")
});
static OVERDUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Overdue\s*[:\-/_]?\s*(.+)").expect("hard-coded pattern"));
static WRITTEN_OFF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Written Off\s*[:\-]?\s*([-\d,\.]+)").expect("hard-coded pattern")
});
static SETTLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Settled\s*[:\-]?\s*([-\d,\.]+)").expect("hard-coded pattern")
});
static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Page\s*(\d+)").expect("hard-coded pattern"));
static CF_NUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Credit Facility\s*(\d+)").expect("hard-coded pattern"));
static CFG_NUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Credit Facility Guaranteed\s*(\d+)").expect("hard-coded pattern")
});
static SANCTIONED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Sanctioned\s+([A-Za-z]{3})\s*[:\-]?\s*([\d,\.]+)").expect("hard-coded pattern")
});
static ALPHA_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("hard-coded pattern"));
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("hard-coded pattern"));

/// Map one document's capture rows onto destination facility rows.
pub fn map_capture_rows(rows: &[Vec<String>]) -> Vec<MappedFacilityRecord> {
    // Flattened view of every non-empty cell, in emission order
    let lines: Vec<String> = rows
        .iter()
        .flat_map(|r| r.iter())
        .filter(|c| !c.is_empty())
        .map(|c| c.trim().to_string())
        .collect();

    // Rank sits beside its label cell, not in the flattened line stream
    let mut rank_vals: Vec<String> = Vec::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if RANK_CELL.is_match(cell.trim()) {
                rank_vals.push(
                    row.get(i + 1)
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default(),
                );
            }
        }
    }

    // Name and PAN appear once near the top
    let mut name_vals: Vec<String> = Vec::new();
    let mut pan_vals: Vec<String> = Vec::new();
    for line in lines.iter().take(10) {
        if let Some(caps) = NAME_RE.captures(line) {
            name_vals.push(caps[1].trim().to_string());
        }
        if let Some(caps) = PAN_RE.captures(line) {
            pan_vals.push(caps[1].trim().to_string());
        }
    }

    let mut type_vals: Vec<String> = Vec::new();
    let mut details_vals: Vec<String> = Vec::new();
    let mut outstanding_vals: Vec<String> = Vec::new();
    let mut overdue_vals: Vec<String> = Vec::new();
    let mut dpd_text_vals: Vec<String> = Vec::new();
    let mut dpd_period_vals: Vec<String> = Vec::new();

    // The borrower-profile section repeats "Type" labels that are not
    // facility types; suppress Type matches until the next facility heading.
    let mut inside_borrower_profile = false;
    for line in &lines {
        if line.contains("Borrower Profile") || line.contains("As Borrower") {
            inside_borrower_profile = true;
        } else if CF_HEADING.is_match(line) {
            inside_borrower_profile = false;
        }

        if !inside_borrower_profile {
            if let Some(caps) = TYPE_RE.captures(line) {
                type_vals.push(caps[1].trim().to_string());
            }
        }
        if let Some(caps) = ASSET_RE.captures(line) {
            let value = caps[1].trim();
            let text_part: Vec<&str> = ALPHA_RUN.find_iter(value).map(|m| m.as_str()).collect();
            let num_part: Vec<&str> = DIGIT_RUN.find_iter(value).map(|m| m.as_str()).collect();
            dpd_text_vals.push(text_part.join(" "));
            dpd_period_vals.push(num_part.join(" "));
        }
        if let Some(caps) = DETAILS_RE.captures(line) {
            details_vals.push(caps[1].trim().to_string());
        }
        if let Some(caps) = OUTSTANDING_RE.captures(line) {
            outstanding_vals.push(caps[1].trim().to_string());
        }
        if let Some(caps) = OVERDUE_RE.captures(line) {
            overdue_vals.push(caps[1].trim().to_string());
        }
    }

    // Written Off / Settled amounts are collected pairwise per line so the
    // two columns stay row-aligned
    let mut written_off_vals: Vec<String> = Vec::new();
    let mut settled_vals: Vec<String> = Vec::new();
    for line in &lines {
        let wo = WRITTEN_OFF_RE
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        let st = SETTLED_RE
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        if !wo.is_empty() || !st.is_empty() {
            written_off_vals.push(wo);
            settled_vals.push(st);
        }
    }

    // A "Page N" value followed within two cells by a facility heading
    // yields the combined "facility/page" reference
    let mut facility_page_vals: Vec<String> = Vec::new();
    for i in 0..lines.len().saturating_sub(2) {
        let Some(page) = PAGE_RE.captures(&lines[i]).map(|c| c[1].to_string()) else {
            continue;
        };
        let next1 = &lines[i + 1];
        let next2 = &lines[i + 2];
        let cf = CF_NUM.captures(next1).or_else(|| CF_NUM.captures(next2));
        if let Some(caps) = cf {
            facility_page_vals.push(format!("{}/{}", &caps[1], page));
            continue;
        }
        let cfg = CFG_NUM.captures(next1).or_else(|| CFG_NUM.captures(next2));
        if let Some(caps) = cfg {
            facility_page_vals.push(format!("{}/{}", &caps[1], page));
        }
    }

    // Sanctioned amounts carry a currency code; a line may hold several
    let mut sanction_vals: Vec<String> = Vec::new();
    for line in &lines {
        let parts: Vec<String> = SANCTIONED_RE
            .captures_iter(line)
            .map(|c| format!("{} {}", c[1].to_uppercase(), c[2].trim()))
            .collect();
        if !parts.is_empty() {
            sanction_vals.push(parts.join(" / "));
        }
    }

    let row_count = [
        type_vals.len(),
        details_vals.len(),
        written_off_vals.len(),
        settled_vals.len(),
        sanction_vals.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);
    if row_count == 0 {
        return Vec::new();
    }

    let name = first_non_empty(&name_vals);
    let pan = first_non_empty(&pan_vals);
    let rank = first_non_empty(&rank_vals);

    let mut out = Vec::with_capacity(row_count);
    for i in 0..row_count {
        let mut rec = MappedFacilityRecord {
            name: name.clone(),
            pan: pan.clone(),
            rank: rank.clone(),
            facility_type: nth(&type_vals, i),
            facility_page: nth(&facility_page_vals, i),
            dpds: nth(&dpd_text_vals, i),
            dpd_period: nth(&dpd_period_vals, i),
            ownership: nth(&details_vals, i),
            sanction_limit: nth(&sanction_vals, i),
            outstanding: nth(&outstanding_vals, i),
            overdue: nth(&overdue_vals, i),
            settled: combine_settled(nth(&settled_vals, i), nth(&written_off_vals, i)),
        };
        rec.fill_no_data();
        out.push(rec);
    }
    out
}

fn nth(vals: &[String], i: usize) -> String {
    vals.get(i).cloned().unwrap_or_default()
}

fn first_non_empty(vals: &[String]) -> String {
    vals.iter()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Fixed convention: when both amounts exist for a row index the cell
/// reads "<settled> / <written off>".
fn combine_settled(settled: String, written_off: String) -> String {
    if !settled.is_empty() && !written_off.is_empty() {
        format!("{settled} / {written_off}")
    } else if !settled.is_empty() {
        settled
    } else {
        written_off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NO_DATA;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn name_pan_rank_replicated_across_rows() {
        let capture = rows(&[
            &["Name: Acme Traders"],
            &["PAN: ABCDE1234F"],
            &["Rank", "4"],
            &["Type: Term Loan"],
            &["Type: Cash Credit"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped.len(), 2);
        assert!(mapped.iter().all(|m| m.name == "Acme Traders"));
        assert!(mapped.iter().all(|m| m.pan == "ABCDE1234F"));
        assert!(mapped.iter().all(|m| m.rank == "4"));
        assert_eq!(mapped[0].facility_type, "Term Loan");
        assert_eq!(mapped[1].facility_type, "Cash Credit");
    }

    #[test]
    fn type_suppressed_inside_borrower_profile() {
        let capture = rows(&[
            &["Borrower Profile"],
            &["Type: Private Limited"],
            &["Credit Facility 1"],
            &["Type: Term Loan"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].facility_type, "Term Loan");
    }

    #[test]
    fn asset_classification_splits_text_and_period() {
        let capture = rows(&[
            &["Type: Term Loan"],
            &["Asset Classification / DPD STD 000 030"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].dpds, "STD");
        assert_eq!(mapped[0].dpd_period, "000 030");
    }

    #[test]
    fn settled_and_written_off_combine_in_fixed_order() {
        let capture = rows(&[
            &["Type: Term Loan"],
            &["Settled: 1,200 Written Off: 3,400"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].settled, "1,200 / 3,400");
    }

    #[test]
    fn lone_written_off_stands_alone() {
        let capture = rows(&[&["Type: Term Loan"], &["Written Off: 3,400"]]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].settled, "3,400");
    }

    #[test]
    fn facility_and_page_pair_up() {
        let capture = rows(&[
            &["Type: Term Loan"],
            &["Page 4"],
            &["Credit Facility 2"],
            &["filler"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].facility_page, "2/4");
    }

    #[test]
    fn guaranteed_facility_pairs_when_no_plain_match() {
        let capture = rows(&[
            &["Type: Term Loan"],
            &["Page 7"],
            &["Credit Facility Guaranteed 3"],
            &["filler"],
        ]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].facility_page, "3/7");
    }

    #[test]
    fn sanctioned_amounts_join_currencies() {
        let capture = rows(&[&["Type: Term Loan"], &["Sanctioned INR 5,00,000 Sanctioned USD 1,000"]]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].sanction_limit, "INR 5,00,000 / USD 1,000");
    }

    #[test]
    fn missing_columns_read_no_data() {
        let capture = rows(&[&["Type: Term Loan"]]);
        let mapped = map_capture_rows(&capture);
        assert_eq!(mapped[0].ownership, NO_DATA);
        assert_eq!(mapped[0].overdue, NO_DATA);
        assert_eq!(mapped[0].settled, NO_DATA);
    }

    #[test]
    fn keyword_free_capture_yields_no_rows() {
        assert!(map_capture_rows(&rows(&[&["nothing relevant"]])).is_empty());
        assert!(map_capture_rows(&[]).is_empty());
    }
}
