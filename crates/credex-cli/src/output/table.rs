use std::fmt::Write as _;

use credex_core::model::{FacilityRecord, IntermediateRecord, MappedFacilityRecord};

fn col_width<I: Iterator<Item = usize>>(lens: I, header: &str) -> usize {
    lens.max().unwrap_or(0).max(header.len())
}

pub fn format_records(records: &[IntermediateRecord]) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("(no records)\n");
        return out;
    }

    let first = &records[0];
    let _ = writeln!(
        out,
        "Name: {}    PAN: {}    Score: {}\n",
        first.name, first.pan, first.score
    );

    let field_w = col_width(records.iter().map(|r| r.field.len()), "Field");
    let _ = writeln!(out, "{:<6} {:<field_w$}  {}", "Page", "Field", "Value");
    for r in records {
        let _ = writeln!(out, "{:<6} {:<field_w$}  {}", r.page, r.field, r.value);
    }
    out
}

pub fn format_facilities(rows: &[FacilityRecord]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("(no facilities)\n");
        return out;
    }

    let first = &rows[0];
    let _ = writeln!(
        out,
        "Name: {}    PAN: {}    Score: {}\n",
        first.name, first.pan, first.score
    );

    let type_w = col_width(rows.iter().map(|r| r.facility_type.len()), "Facility type");
    let own_w = col_width(rows.iter().map(|r| r.ownership.len()), "Ownership");
    let limit_w = col_width(rows.iter().map(|r| r.sanction_limit.len()), "Sanction limit");
    let os_w = col_width(rows.iter().map(|r| r.outstanding.len()), "O/s Amount");
    let dpd_w = col_width(rows.iter().map(|r| r.dpds.len()), "DPDs");

    let _ = writeln!(
        out,
        "{:<6} {:<type_w$}  {:<own_w$}  {:<limit_w$}  {:<os_w$}  {:<dpd_w$}  {}",
        "Page", "Facility type", "Ownership", "Sanction limit", "O/s Amount", "DPDs", "Overdue"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<6} {:<type_w$}  {:<own_w$}  {:<limit_w$}  {:<os_w$}  {:<dpd_w$}  {}",
            r.page, r.facility_type, r.ownership, r.sanction_limit, r.outstanding, r.dpds, r.overdue
        );
    }
    out
}

pub fn format_mapped(rows: &[MappedFacilityRecord]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("(no facilities)\n");
        return out;
    }

    let first = &rows[0];
    let _ = writeln!(
        out,
        "Name: {}    PAN: {}    Rank: {}\n",
        first.name, first.pan, first.rank
    );

    let type_w = col_width(rows.iter().map(|r| r.facility_type.len()), "Facility type");
    let page_w = col_width(rows.iter().map(|r| r.facility_page.len()), "Facility/Page");
    let limit_w = col_width(rows.iter().map(|r| r.sanction_limit.len()), "Sanction limit");
    let os_w = col_width(rows.iter().map(|r| r.outstanding.len()), "O/s Amount");
    let dpd_w = col_width(rows.iter().map(|r| r.dpds.len()), "DPDs");
    let period_w = col_width(rows.iter().map(|r| r.dpd_period.len()), "DPD period");
    let over_w = col_width(rows.iter().map(|r| r.overdue.len()), "Overdue");

    let _ = writeln!(
        out,
        "{:<type_w$}  {:<page_w$}  {:<limit_w$}  {:<os_w$}  {:<dpd_w$}  {:<period_w$}  {:<over_w$}  {}",
        "Facility type",
        "Facility/Page",
        "Sanction limit",
        "O/s Amount",
        "DPDs",
        "DPD period",
        "Overdue",
        "Settled/Written Off"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<type_w$}  {:<page_w$}  {:<limit_w$}  {:<os_w$}  {:<dpd_w$}  {:<period_w$}  {:<over_w$}  {}",
            r.facility_type,
            r.facility_page,
            r.sanction_limit,
            r.outstanding,
            r.dpds,
            r.dpd_period,
            r.overdue,
            r.settled
        );
    }
    out
}
