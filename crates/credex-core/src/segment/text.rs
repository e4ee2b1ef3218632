//! Text-mode segmenter: scans the normalized line stream for labeled
//! fields (`TYPE:`, `OWNERSHIP:`, ...) and accumulates them into
//! per-facility accounts, closing each account when every expected field
//! is present or the stream moves past its section (page-gap heuristic).

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{TextRules, DPD_HEADER};
use crate::model::{BorrowerInfo, FieldKind, IntermediateRecord, RawLine, NO_DATA};

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{5}[0-9]{4}[A-Z])\b").expect("hard-coded pattern"));
static THREE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}").expect("hard-coded pattern"));
static THREE_DIGITS_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}$").expect("hard-coded pattern"));
static ALNUM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\s]+$").expect("hard-coded pattern"));

/// Fields accumulated for one in-progress facility account.
pub type AccountFields = HashMap<FieldKind, String>;

/// Document-level borrower scalars, extracted independently of the account
/// state machine. First non-empty detection wins for each scalar.
pub fn extract_borrower_info(rules: &TextRules, lines: &[RawLine]) -> BorrowerInfo {
    let mut info = BorrowerInfo::default();

    for (i, line) in lines.iter().enumerate() {
        let upper = line.text.to_uppercase();

        if info.pan.is_none() {
            if let Some(caps) = PAN_RE.captures(&line.text) {
                info.pan = Some(caps[1].to_string());
            }
        }

        if info.score.is_none() && upper.contains("SCORE") {
            if let Some(m) = THREE_DIGITS.find(&line.text) {
                info.score = Some(m.as_str().to_string());
            } else if let Some(next) = lines.get(i + 1) {
                if THREE_DIGITS_EXACT.is_match(&next.text) {
                    info.score = Some(next.text.clone());
                }
            }
        }

        if info.name.is_none() {
            for keyword in &rules.name_keywords {
                if upper.contains(keyword.as_str()) {
                    let candidate = match line.text.split_once(':') {
                        Some((_, rest)) => rest.trim().to_string(),
                        None => lines.get(i + 1).map(|l| l.text.clone()).unwrap_or_default(),
                    };
                    if !candidate.is_empty() {
                        info.name = Some(candidate);
                    }
                    break;
                }
            }
        }
    }

    info
}

/// What the segmenter decided about one line.
enum LineAction {
    Field(FieldKind, String),
    /// Recognized but intentionally ignored (HIGH CREDIT when Sanctioned
    /// is already set); does not advance the gap logic.
    Skip,
    Plain,
}

fn after_colon(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

fn classify_line(
    rules: &TextRules,
    lines: &[RawLine],
    i: usize,
    account: &AccountFields,
) -> LineAction {
    let line = &lines[i].text;
    let upper = line.to_uppercase();

    if upper.starts_with("TYPE:") {
        let mut value = after_colon(line);
        // Facility-type values wrap across two physical lines; absorb the
        // next line unless it opens a field of its own. The absorbed line
        // still flows through the state machine as a plain line.
        if let Some(next) = lines.get(i + 1) {
            let next_text = next.text.trim();
            if !next_text.is_empty() && !FieldKind::is_field_prefix(&next_text.to_uppercase()) {
                value = if value.is_empty() {
                    next_text.to_string()
                } else {
                    format!("{value} {next_text}")
                };
            }
        }
        return LineAction::Field(FieldKind::Type, value);
    }

    if upper.starts_with("OWNERSHIP:") {
        return LineAction::Field(FieldKind::Ownership, after_colon(line));
    }

    if upper.starts_with("SANCTIONED:") {
        return LineAction::Field(FieldKind::Sanctioned, after_colon(line));
    }

    if upper.starts_with("HIGH CREDIT:") {
        let sanctioned_set = account
            .get(&FieldKind::Sanctioned)
            .map_or(false, |v| !v.is_empty());
        return if sanctioned_set {
            LineAction::Skip
        } else {
            LineAction::Field(FieldKind::Sanctioned, after_colon(line))
        };
    }

    if upper.starts_with("CURRENT BALANCE:") {
        return LineAction::Field(FieldKind::CurrentBalance, after_colon(line));
    }

    if upper.contains(DPD_HEADER) {
        return LineAction::Field(FieldKind::Dpd, recover_dpd_value(rules, lines, i));
    }

    LineAction::Plain
}

/// The DPD value sits a few lines below its section header, mixed with
/// footer fragments. Scan forward for the first purely alphanumeric line,
/// stopping at the next field line; fall back to the header line itself.
fn recover_dpd_value(rules: &TextRules, lines: &[RawLine], i: usize) -> String {
    let mut value = String::new();
    for j in 1..=rules.dpd_scan_window {
        let Some(next) = lines.get(i + j) else { break };
        let next_upper = next.text.trim().to_uppercase();
        if FieldKind::is_field_prefix(&next_upper) {
            break;
        }
        if rules
            .dpd_skip_prefixes
            .iter()
            .any(|p| next_upper.starts_with(p.as_str()))
        {
            continue;
        }
        if ALNUM_LINE.is_match(&next_upper) {
            value = next_upper;
            break;
        }
    }
    if value.is_empty() {
        lines[i].text.trim().to_string()
    } else {
        value
    }
}

/// Scan the line stream into per-facility field maps, each anchored at the
/// page where its first field appeared.
///
/// A non-field line while an account is open accumulates the page gap;
/// the account closes once the gap exceeds the configured limit or every
/// expected field is present. A second `Type` field closes the account
/// directly (it belongs to the next facility). End of stream closes
/// unconditionally.
pub fn segment_accounts(rules: &TextRules, lines: &[RawLine]) -> Vec<(usize, AccountFields)> {
    let mut accounts = Vec::new();
    let mut current: AccountFields = HashMap::new();
    let mut current_page: Option<usize> = None;
    let mut last_field_page: Option<usize> = None;
    let mut gap_count = 0usize;

    for i in 0..lines.len() {
        let page = lines[i].page;
        match classify_line(rules, lines, i, &current) {
            LineAction::Field(field, value) => {
                // A second Type is the start of the next facility, not an
                // overwrite of the current one
                if field == FieldKind::Type && current.contains_key(&FieldKind::Type) {
                    if let Some(p) = current_page {
                        accounts.push((p, std::mem::take(&mut current)));
                    }
                }
                if current.is_empty() {
                    current_page = Some(page);
                }
                current.insert(field, value);
                last_field_page = Some(page);
                gap_count = 0;
            }
            LineAction::Skip => {}
            LineAction::Plain => {
                if current.is_empty() {
                    continue;
                }
                if let Some(anchor) = last_field_page.or(current_page) {
                    if page > anchor {
                        gap_count += page - anchor;
                        last_field_page = Some(page);
                    }
                }
                if gap_count > rules.gap_limit || current.len() == FieldKind::ORDERED.len() {
                    if let Some(p) = current_page {
                        accounts.push((p, std::mem::take(&mut current)));
                    }
                    gap_count = 0;
                }
            }
        }
    }

    if !current.is_empty() {
        if let Some(p) = current_page {
            accounts.push((p, current));
        }
    }

    accounts
}

/// Full text-mode extraction: borrower scalars, account segmentation, and
/// per-field record emission with placeholder back-fill so every input
/// page appears in the output.
pub fn extract_records(rules: &TextRules, lines: &[RawLine]) -> Vec<IntermediateRecord> {
    let info = extract_borrower_info(rules, lines);
    let pan = info.pan.unwrap_or_default();
    let name = info.name.unwrap_or_default();
    let score = info.score.unwrap_or_default();

    let mut records = Vec::new();
    for (page, fields) in segment_accounts(rules, lines) {
        // An account where every expected field is absent carries no signal
        let all_absent = FieldKind::ORDERED
            .iter()
            .all(|f| fields.get(f).map_or(true, |v| v.as_str() == NO_DATA));
        if all_absent {
            continue;
        }
        for field in FieldKind::ORDERED {
            let value = fields
                .get(&field)
                .cloned()
                .unwrap_or_else(|| NO_DATA.to_string());
            records.push(IntermediateRecord {
                page,
                pan: pan.clone(),
                name: name.clone(),
                score: score.clone(),
                field: field.as_str().to_string(),
                value,
            });
        }
    }

    let pages_seen: BTreeSet<usize> = lines.iter().map(|l| l.page).collect();
    let used: BTreeSet<usize> = records.iter().map(|r| r.page).collect();
    let missing: Vec<usize> = pages_seen.difference(&used).copied().collect();
    for page in missing {
        records.push(IntermediateRecord {
            page,
            pan: pan.clone(),
            name: name.clone(),
            score: score.clone(),
            field: NO_DATA.to_string(),
            value: NO_DATA.to_string(),
        });
    }

    for rec in &mut records {
        if rec.value.is_empty() {
            rec.value = NO_DATA.to_string();
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(page: usize, text: &str) -> RawLine {
        RawLine {
            page,
            text: text.to_string(),
        }
    }

    #[test]
    fn borrower_scalars_extracted() {
        let rules = TextRules::default();
        let lines = vec![
            line(1, "CONSUMER NAME: John Doe"),
            line(1, "PAN ABCDE1234F"),
            line(1, "CIBIL SCORE"),
            line(1, "740"),
        ];
        let info = extract_borrower_info(&rules, &lines);
        assert_eq!(info.name.as_deref(), Some("John Doe"));
        assert_eq!(info.pan.as_deref(), Some("ABCDE1234F"));
        assert_eq!(info.score.as_deref(), Some("740"));
    }

    #[test]
    fn score_taken_from_same_line_when_present() {
        let rules = TextRules::default();
        let lines = vec![line(1, "SCORE 812")];
        let info = extract_borrower_info(&rules, &lines);
        assert_eq!(info.score.as_deref(), Some("812"));
    }

    #[test]
    fn type_continuation_absorbs_next_line() {
        let rules = TextRules::default();
        let lines = vec![line(1, "TYPE: Auto Loan"), line(1, "Joint")];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].1[&FieldKind::Type], "Auto Loan Joint");
    }

    #[test]
    fn type_continuation_stops_at_next_field() {
        let rules = TextRules::default();
        let lines = vec![line(1, "TYPE: Auto Loan"), line(1, "OWNERSHIP: Individual")];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts[0].1[&FieldKind::Type], "Auto Loan");
        assert_eq!(accounts[0].1[&FieldKind::Ownership], "Individual");
    }

    #[test]
    fn high_credit_fills_sanctioned_only_as_fallback() {
        let rules = TextRules::default();

        let lines = vec![line(1, "HIGH CREDIT: 50000")];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts[0].1[&FieldKind::Sanctioned], "50000");

        let lines = vec![line(1, "SANCTIONED: 100000"), line(1, "HIGH CREDIT: 50000")];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts[0].1[&FieldKind::Sanctioned], "100000");
    }

    #[test]
    fn gap_closes_account_on_third_page_advance() {
        let rules = TextRules::default();
        let lines = vec![
            line(1, "TYPE: Gold Loan"),
            line(1, "OWNERSHIP: Individual"),
            line(1, "SANCTIONED: 20000"),
            line(2, "some narrative text"),
            line(3, "more narrative text"),
            line(4, "even more narrative"),
            line(4, "TYPE: Credit Card"),
        ];
        let accounts = segment_accounts(&rules, &lines);
        // First account closed by the gap on page 4, second opened there
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].0, 1);
        assert_eq!(accounts[1].0, 4);
    }

    #[test]
    fn gap_within_limit_keeps_account_open() {
        let rules = TextRules::default();
        let lines = vec![
            line(1, "TYPE: Gold Loan"),
            line(2, "narrative"),
            line(3, "narrative"),
            line(3, "OWNERSHIP: Joint"),
        ];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].1.len(), 2);
    }

    #[test]
    fn complete_account_closes_on_next_plain_line() {
        let rules = TextRules::default();
        let lines = vec![
            line(1, "TYPE: Credit Card"),
            line(1, "OWNERSHIP: Individual"),
            line(1, "SANCTIONED: 100000"),
            line(1, "CURRENT BALANCE: 5000"),
            line(
                1,
                "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)",
            ),
            line(1, "000 000 030"),
            line(1, "TYPE: Auto Loan"),
        ];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].1[&FieldKind::Dpd], "000 000 030");
        assert_eq!(accounts[1].1[&FieldKind::Type], "Auto Loan");
    }

    #[test]
    fn dpd_recovery_skips_footer_fragments() {
        let rules = TextRules::default();
        let lines = vec![
            line(
                1,
                "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)",
            ),
            line(1, "CONSUMER CIR statement"),
            line(1, "000 000 XXX"),
        ];
        let accounts = segment_accounts(&rules, &lines);
        assert_eq!(accounts[0].1[&FieldKind::Dpd], "000 000 XXX");
    }

    #[test]
    fn dpd_recovery_falls_back_to_header_line() {
        let rules = TextRules::default();
        let lines = vec![
            line(
                1,
                "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)",
            ),
            line(1, "narrative, with punctuation."),
        ];
        let accounts = segment_accounts(&rules, &lines);
        assert!(accounts[0].1[&FieldKind::Dpd].starts_with("DAYS PAST DUE"));
    }

    #[test]
    fn records_default_missing_fields_to_no_data() {
        let rules = TextRules::default();
        let lines = vec![line(1, "TYPE: Auto Loan"), line(1, "OWNERSHIP: Individual")];
        let records = extract_records(&rules, &lines);
        assert_eq!(records.len(), FieldKind::ORDERED.len());
        let dpd = records.iter().find(|r| r.field == "DPD").unwrap();
        assert_eq!(dpd.value, NO_DATA);
    }

    #[test]
    fn field_free_pages_get_placeholder_records() {
        let rules = TextRules::default();
        let lines = vec![
            line(1, "TYPE: Auto Loan"),
            line(1, "OWNERSHIP: Individual"),
            line(2, "narrative only"),
        ];
        let records = extract_records(&rules, &lines);
        let page2: Vec<_> = records.iter().filter(|r| r.page == 2).collect();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].field, NO_DATA);
        assert_eq!(page2[0].value, NO_DATA);
    }

    #[test]
    fn keyword_free_input_yields_placeholders_only() {
        let rules = TextRules::default();
        let lines = vec![line(1, "unrelated narrative"), line(2, "more narrative")];
        let records = extract_records(&rules, &lines);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.field == NO_DATA));
    }
}
