use regex::Regex;

/// Section header carrying the delinquency/asset-classification history in
/// text-layout reports. Matched against uppercased lines.
pub const DPD_HEADER: &str = "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)";

/// Heuristic constants for the text-layout report family.
///
/// The segmenter takes these by reference at construction; `Default`
/// carries the values for the known consumer-report layout. No runtime
/// config loading — variants are expressed as a different `TextRules`.
#[derive(Debug, Clone)]
pub struct TextRules {
    /// Boilerplate patterns blanked out of every line before segmentation.
    pub footer_patterns: Vec<Regex>,
    /// Literal fragments removed after pattern substitution.
    pub footer_fragments: Vec<String>,
    /// Keywords that locate the borrower name line, tried in order.
    pub name_keywords: Vec<String>,
    /// Uppercased prefixes that disqualify a lookahead line as a DPD value.
    pub dpd_skip_prefixes: Vec<String>,
    /// How many lines the DPD value recovery scans forward.
    pub dpd_scan_window: usize,
    /// An open account closes once the accumulated page gap exceeds this.
    pub gap_limit: usize,
}

impl Default for TextRules {
    fn default() -> Self {
        let footer_patterns = [
            r"©.*TransUnion CIBIL.*",
            r"Formerly: Credit Information Bureau.*",
            r"all rights reserved\.?",
            r"CIN\s*:\s*[A-Z0-9\-]+",
            r"MEMBER\s+ID\s*:\s*.*",
            r"CONTROL\s+NUMBER\s*:\s*.*",
            r"DATE\s*:\s*\d{2}-\d{2}-\d{4}",
            r"PAGE\s*\d+\s*OF\s*\d+.*",
        ]
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("hard-coded pattern"))
        .collect();

        TextRules {
            footer_patterns,
            footer_fragments: vec!["TransUnion CIBIL".to_string()],
            name_keywords: vec!["CONSUMER NAME".to_string(), "NAME".to_string()],
            dpd_skip_prefixes: vec![
                "CONSUMER CIR".to_string(),
                "DATE:".to_string(),
                "PAGE".to_string(),
                "CONTROL NUMBER".to_string(),
                "MEMBER ID".to_string(),
            ],
            dpd_scan_window: 5,
            gap_limit: 2,
        }
    }
}

/// One trigger keyword of the table-layout capture window.
#[derive(Debug, Clone)]
pub struct KeywordCapture {
    pub keyword: String,
    /// Rows emitted after the trigger before the window closes.
    pub row_budget: usize,
    /// Captured at most once per document regardless of how many tables
    /// repeat the keyword.
    pub global: bool,
}

/// Heuristic constants for the table-layout report family.
#[derive(Debug, Clone)]
pub struct TableRules {
    /// Trigger keywords, tried in order against each row's joined text.
    pub captures: Vec<KeywordCapture>,
    /// Lowercased joined-row marker whose row is merged with the next
    /// row's first cell (classification text split across two rows).
    pub merge_marker: String,
    /// Capture keyword under which a literal "rank" row consumes the next
    /// row and emits a normalized `(Rank, value)` pair.
    pub rank_capture: String,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            captures: vec![
                KeywordCapture {
                    keyword: "Credit Facility Details".to_string(),
                    row_budget: 15,
                    global: false,
                },
                KeywordCapture {
                    keyword: "Borrower Profile".to_string(),
                    row_budget: 15,
                    global: true,
                },
                KeywordCapture {
                    keyword: "TransUnion CIBIL Rank".to_string(),
                    row_budget: 15,
                    global: true,
                },
            ],
            merge_marker: "asset classification / dpd".to_string(),
            rank_capture: "TransUnion CIBIL Rank".to_string(),
        }
    }
}
