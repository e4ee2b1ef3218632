use std::sync::LazyLock;

use regex::Regex;

use crate::config::TextRules;
use crate::extraction::PageContent;
use crate::model::RawLine;

static MULTI_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("hard-coded pattern"));

/// Strip boilerplate patterns and the bureau-name fragment from one line,
/// then collapse repeated whitespace.
pub fn clean_line(rules: &TextRules, line: &str) -> String {
    let mut s = line.to_string();
    for pat in &rules.footer_patterns {
        s = pat.replace_all(&s, "").into_owned();
    }
    for frag in &rules.footer_fragments {
        s = s.replace(frag.as_str(), "");
    }
    MULTI_WS.replace_all(&s, " ").trim().to_string()
}

/// Normalize extracted pages into the ordered line stream. Lines that
/// become empty after cleaning are dropped.
pub fn normalize_pages(rules: &TextRules, pages: &[PageContent]) -> Vec<RawLine> {
    let mut out = Vec::new();
    for page in pages {
        for line in &page.lines {
            let cleaned = clean_line(rules, line.trim());
            if !cleaned.is_empty() {
                out.push(RawLine {
                    page: page.page_number,
                    text: cleaned,
                });
            }
        }
    }
    out
}

/// Trim one table cell (missing cells arrive as empty strings).
pub fn clean_cell(cell: &str) -> String {
    cell.trim().to_string()
}

/// Joined, lowercased form of a cleaned row, used for keyword matching.
/// The per-cell values are preserved separately for row emission.
pub fn join_row(cells: &[String]) -> String {
    cells.join(" ").trim().to_lowercase()
}
