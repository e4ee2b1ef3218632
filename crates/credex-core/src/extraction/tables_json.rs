use crate::error::CredexError;
use crate::extraction::PageTables;

/// Read pre-extracted table content from its JSON form.
///
/// Table extraction itself happens outside the core (the PDF table reader
/// is an external collaborator); its output arrives here as one
/// `PageTables` per page:
///
/// ```json
/// [
///   { "page_number": 1, "tables": [ [ ["TYPE", "Term Loan"], ["", ""] ] ] }
/// ]
/// ```
pub fn read_tables(bytes: &[u8]) -> Result<Vec<PageTables>, CredexError> {
    let pages: Vec<PageTables> = serde_json::from_slice(bytes)?;
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_tables() {
        let json = r#"[
            {"page_number": 1, "tables": [[["Borrower Profile", ""], ["Name", "Acme"]]]},
            {"page_number": 2, "tables": []}
        ]"#;
        let pages = read_tables(json.as_bytes()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tables[0][1][1], "Acme");
        assert!(pages[1].tables.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(read_tables(b"{not json").is_err());
    }
}
