//! Table-mode segmenter: scans table rows for trigger keywords and opens
//! a bounded capture window per keyword, emitting the windowed rows in
//! CSV shape for the downstream field mapper.

use std::collections::HashSet;

use crate::config::TableRules;
use crate::extraction::PageTables;
use crate::segment::normalize::{clean_cell, join_row};

/// Segment one document's tables into capture rows.
///
/// Emitted rows are, in order: a marker row naming the page/table/keyword,
/// the trigger row itself, then up to `row_budget` captured rows, then one
/// empty separator row. The used-keyword set for global keywords is scoped
/// to this call, so each document starts fresh.
pub fn segment_tables(rules: &TableRules, pages: &[PageTables]) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = Vec::new();
    let mut used_globals: HashSet<usize> = HashSet::new();

    for page in pages {
        for (table_idx, table) in page.tables.iter().enumerate() {
            // (capture index, rows captured so far)
            let mut capturing: Option<(usize, usize)> = None;
            let mut i = 0;

            while i < table.len() {
                let row = &table[i];
                if row.iter().all(|c| c.is_empty()) {
                    i += 1;
                    continue;
                }
                let cleaned: Vec<String> = row.iter().map(|c| clean_cell(c)).collect();
                let joined = join_row(&cleaned);

                let Some((cap_idx, captured)) = capturing else {
                    for (idx, cap) in rules.captures.iter().enumerate() {
                        if !joined.contains(&cap.keyword.to_lowercase()) {
                            continue;
                        }
                        if cap.global && used_globals.contains(&idx) {
                            continue;
                        }
                        if cap.global {
                            used_globals.insert(idx);
                        }
                        out.push(vec![format!(
                            "Page {} - Table {} - Keyword: {}",
                            page.page_number,
                            table_idx + 1,
                            cap.keyword
                        )]);
                        out.push(cleaned.clone());
                        capturing = Some((idx, 0));
                        break;
                    }
                    i += 1;
                    continue;
                };
                let cap = &rules.captures[cap_idx];

                // Classification text split across two physical rows: merge
                // the next row's first cell into this one.
                if joined.contains(&rules.merge_marker) && i + 1 < table.len() {
                    let next: Vec<String> = table[i + 1].iter().map(|c| clean_cell(c)).collect();
                    let mut merged = vec![format!(
                        "{} {}",
                        cleaned.first().map(String::as_str).unwrap_or(""),
                        next.first().map(String::as_str).unwrap_or("")
                    )];
                    merged.extend(cleaned.iter().skip(1).cloned());
                    out.push(merged);
                    capturing = Some((cap_idx, captured + 1));
                    i += 2;
                    continue;
                }

                // Under the rank keyword, a literal "rank" row means the
                // value sits in the second cell of the following row.
                if cap.keyword == rules.rank_capture
                    && cleaned.iter().any(|c| c.eq_ignore_ascii_case("rank"))
                {
                    i += 1;
                    if i < table.len() {
                        let next: Vec<String> = table[i].iter().map(|c| clean_cell(c)).collect();
                        let value = match next.get(1) {
                            Some(v) => v.clone(),
                            None => "NA".to_string(),
                        };
                        out.push(vec!["Rank".to_string(), value]);
                        capturing = Some((cap_idx, captured + 1));
                        i += 1;
                    }
                    continue;
                }

                if captured < cap.row_budget {
                    out.push(cleaned);
                    capturing = Some((cap_idx, captured + 1));
                    i += 1;
                } else {
                    // Budget exhausted: close the window and re-evaluate
                    // this same row as a potential new trigger.
                    out.push(Vec::new());
                    capturing = None;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[&str]) -> Vec<String> {
        row.iter().map(|c| c.to_string()).collect()
    }

    fn one_table(rows: &[&[&str]]) -> Vec<PageTables> {
        vec![PageTables {
            page_number: 1,
            tables: vec![rows.iter().map(|r| cells(r)).collect()],
        }]
    }

    #[test]
    fn trigger_emits_marker_and_trigger_row() {
        let rules = TableRules::default();
        let pages = one_table(&[
            &["Credit Facility Details", ""],
            &["Sanctioned Limit", "500000"],
        ]);
        let rows = segment_tables(&rules, &pages);
        assert_eq!(
            rows[0],
            vec!["Page 1 - Table 1 - Keyword: Credit Facility Details".to_string()]
        );
        assert_eq!(rows[1], cells(&["Credit Facility Details", ""]));
        assert_eq!(rows[2], cells(&["Sanctioned Limit", "500000"]));
    }

    #[test]
    fn rank_row_takes_value_from_next_row() {
        let rules = TableRules::default();
        let pages = one_table(&[&["TransUnion CIBIL Rank"], &["Rank"], &["", "720"]]);
        let rows = segment_tables(&rules, &pages);
        assert!(rows.contains(&vec!["Rank".to_string(), "720".to_string()]));
    }

    #[test]
    fn rank_row_defaults_to_na_when_next_row_is_short() {
        let rules = TableRules::default();
        let pages = one_table(&[&["TransUnion CIBIL Rank"], &["Rank"], &["only one cell"]]);
        let rows = segment_tables(&rules, &pages);
        assert!(rows.contains(&vec!["Rank".to_string(), "NA".to_string()]));
    }

    #[test]
    fn classification_header_merges_next_row_first_cell() {
        let rules = TableRules::default();
        let pages = one_table(&[
            &["Credit Facility Details"],
            &["Asset Classification / DPD", "000 000"],
            &["STD", ""],
        ]);
        let rows = segment_tables(&rules, &pages);
        assert!(rows.contains(&cells(&["Asset Classification / DPD STD", "000 000"])));
        // The merged row consumed its continuation; "STD" is not re-emitted
        assert!(!rows.contains(&cells(&["STD", ""])));
    }

    #[test]
    fn global_keyword_captured_once_per_document() {
        let rules = TableRules::default();
        let pages = vec![
            PageTables {
                page_number: 1,
                tables: vec![vec![cells(&["Borrower Profile"]), cells(&["Name", "Acme"])]],
            },
            PageTables {
                page_number: 2,
                tables: vec![vec![cells(&["Borrower Profile"]), cells(&["Name", "Acme"])]],
            },
        ];
        let rows = segment_tables(&rules, &pages);
        let markers: Vec<_> = rows
            .iter()
            .filter(|r| r.len() == 1 && r[0].contains("Keyword: Borrower Profile"))
            .collect();
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn non_global_keyword_retriggers_per_table() {
        let rules = TableRules::default();
        let pages = vec![PageTables {
            page_number: 1,
            tables: vec![
                vec![cells(&["Credit Facility Details"]), cells(&["row", "1"])],
                vec![cells(&["Credit Facility Details"]), cells(&["row", "2"])],
            ],
        }];
        let rows = segment_tables(&rules, &pages);
        let markers: Vec<_> = rows
            .iter()
            .filter(|r| r.len() == 1 && r[0].contains("Keyword: Credit Facility Details"))
            .collect();
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn budget_exhaustion_emits_separator_and_retriggers() {
        let rules = TableRules {
            captures: vec![crate::config::KeywordCapture {
                keyword: "Credit Facility Details".to_string(),
                row_budget: 1,
                global: false,
            }],
            ..TableRules::default()
        };
        let mut table: Vec<Vec<String>> = vec![
            cells(&["Credit Facility Details"]),
            cells(&["captured", ""]),
            cells(&["Credit Facility Details"]),
            cells(&["captured again", ""]),
        ];
        let pages = vec![PageTables {
            page_number: 1,
            tables: vec![std::mem::take(&mut table)],
        }];
        let rows = segment_tables(&rules, &pages);
        // window 1: marker, trigger, captured; separator; window 2 retriggered
        assert!(rows.contains(&Vec::new()));
        let markers = rows
            .iter()
            .filter(|r| r.len() == 1 && r[0].contains("Keyword:"))
            .count();
        assert_eq!(markers, 2);
        assert!(rows.contains(&cells(&["captured again", ""])));
    }

    #[test]
    fn keyword_free_tables_emit_nothing() {
        let rules = TableRules::default();
        let pages = one_table(&[&["just", "data"], &["more", "data"]]);
        assert!(segment_tables(&rules, &pages).is_empty());
    }

    #[test]
    fn empty_rows_are_skipped() {
        let rules = TableRules::default();
        let pages = one_table(&[&["", ""], &["Borrower Profile"], &["Name", "Acme"]]);
        let rows = segment_tables(&rules, &pages);
        assert_eq!(rows.len(), 3);
    }
}
