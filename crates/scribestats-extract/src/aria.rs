//! Tier 3: ARIA-role table fallback.
//!
//! Virtualized or non-semantic dashboards render rows as styled `<div>`s
//! with `role="table"` / `role="row"` / `role="cell"` attributes instead of
//! native table markup. The column logic is identical to tier 2.

use scraper::{Html, Selector};

use scribestats_core::ArticleRecord;

use crate::columns::records_from_rows;
use crate::table::cell_text;

pub(crate) fn extract(html: &str) -> Option<Vec<ArticleRecord>> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse(r#"[role="table"]"#).expect("valid selector");
    let row_sel = Selector::parse(r#"[role="row"]"#).expect("valid selector");
    let cell_sel =
        Selector::parse(r#"[role="cell"], [role="columnheader"]"#).expect("valid selector");

    for table in doc.select(&table_sel) {
        let rows: Vec<Vec<String>> = table
            .select(&row_sel)
            .map(|row| row.select(&cell_sel).map(cell_text).collect())
            .collect();
        if let Some(records) = records_from_rows(&rows, "aria_table") {
            return Some(records);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_role_table_markup() {
        let html = r#"
            <div role="table">
              <div role="row">
                <span role="columnheader">Title</span>
                <span role="columnheader">Views</span>
                <span role="columnheader">Reads</span>
              </div>
              <div role="row">
                <span role="cell">Virtualized Story</span>
                <span role="cell">501</span>
                <span role="cell">77</span>
              </div>
            </div>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Virtualized Story");
        assert_eq!(records[0].views, Some(501));
        assert_eq!(records[0].source, "aria_table");
    }

    #[test]
    fn headerless_role_table_reads_positionally() {
        let html = r#"
            <div role="table">
              <div role="row">
                <span role="cell">Jul 2025</span>
                <span role="cell">Positional Story</span>
                <span role="cell">9</span>
                <span role="cell">3</span>
              </div>
            </div>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records[0].title, "Positional Story");
        assert_eq!(records[0].views, Some(9));
        assert_eq!(records[0].reads, Some(3));
    }

    #[test]
    fn no_role_table_is_a_miss() {
        assert!(extract("<div><span>plain page</span></div>").is_none());
    }
}
