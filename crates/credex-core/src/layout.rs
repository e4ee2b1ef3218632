use crate::extraction::{PageContent, PageTables};
use crate::model::LayoutKind;

/// Pages inspected when deciding the layout family.
pub const DETECT_PAGE_LIMIT: usize = 3;

/// Minimum stripped text length for a page to count as text-layout.
const TEXT_THRESHOLD: usize = 100;

/// Decide which extraction strategy fits a document, from whatever content
/// the external readers produced. Table content wins over text; documents
/// with neither degrade to `Unknown` rather than failing.
pub fn detect_layout(tables: &[PageTables], pages: &[PageContent]) -> LayoutKind {
    if has_table_content(tables) {
        LayoutKind::Table
    } else if has_text_content(pages) {
        LayoutKind::Text
    } else {
        LayoutKind::Unknown
    }
}

/// Any table with a non-empty row within the first few pages.
pub fn has_table_content(tables: &[PageTables]) -> bool {
    tables.iter().take(DETECT_PAGE_LIMIT).any(|page| {
        page.tables
            .iter()
            .any(|table| table.iter().any(|row| row.iter().any(|c| !c.trim().is_empty())))
    })
}

/// Any page within the first few whose text is longer than a cover page.
pub fn has_text_content(pages: &[PageContent]) -> bool {
    pages.iter().take(DETECT_PAGE_LIMIT).any(|page| {
        page.lines.iter().map(|l| l.trim().len()).sum::<usize>() > TEXT_THRESHOLD
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_page(number: usize, text: &str) -> PageContent {
        PageContent {
            page_number: number,
            lines: vec![text.to_string()],
        }
    }

    #[test]
    fn tables_win_over_text() {
        let tables = vec![PageTables {
            page_number: 1,
            tables: vec![vec![vec!["Borrower Profile".to_string()]]],
        }];
        let pages = vec![text_page(1, &"x".repeat(200))];
        assert_eq!(detect_layout(&tables, &pages), LayoutKind::Table);
    }

    #[test]
    fn long_text_without_tables_is_text() {
        let pages = vec![text_page(1, &"x".repeat(200))];
        assert_eq!(detect_layout(&[], &pages), LayoutKind::Text);
    }

    #[test]
    fn short_text_is_unknown() {
        let pages = vec![text_page(1, "short")];
        assert_eq!(detect_layout(&[], &pages), LayoutKind::Unknown);
    }

    #[test]
    fn empty_tables_do_not_count() {
        let tables = vec![PageTables {
            page_number: 1,
            tables: vec![vec![vec!["".to_string(), " ".to_string()]]],
        }];
        assert_eq!(detect_layout(&tables, &[]), LayoutKind::Unknown);
    }

    #[test]
    fn tables_beyond_page_limit_are_ignored() {
        let mut tables: Vec<PageTables> = (1..=3)
            .map(|n| PageTables {
                page_number: n,
                tables: vec![],
            })
            .collect();
        tables.push(PageTables {
            page_number: 4,
            tables: vec![vec![vec!["data".to_string()]]],
        });
        assert_eq!(detect_layout(&tables, &[]), LayoutKind::Unknown);
    }
}
