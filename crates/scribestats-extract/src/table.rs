//! Tier 2: column-mapped extraction from a native `<table>`.
//!
//! Locates the stats table by known (obfuscated) style classes first, then
//! generically by requiring both "view"-like and "read"-like text inside the
//! table. Column logic is shared with the ARIA tier via [`crate::columns`].

use scraper::{ElementRef, Html, Selector};

use scribestats_core::ArticleRecord;

use crate::columns::records_from_rows;

/// Class patterns observed on past dashboard iterations.
const KNOWN_TABLE_SELECTOR: &str = "table.ji, table.stats-table";

pub(crate) fn extract(html: &str) -> Option<Vec<ArticleRecord>> {
    let doc = Html::parse_document(html);
    let table = find_stats_table(&doc)?;

    let row_sel = Selector::parse("tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");

    let rows: Vec<Vec<String>> = table
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(cell_text).collect())
        .collect();

    records_from_rows(&rows, "table")
}

fn find_stats_table(doc: &Html) -> Option<ElementRef<'_>> {
    let known = Selector::parse(KNOWN_TABLE_SELECTOR).expect("valid selector");
    if let Some(table) = doc.select(&known).next() {
        return Some(table);
    }

    let any_table = Selector::parse("table").expect("valid selector");
    doc.select(&any_table).find(|table| {
        let text: String = table.text().collect::<String>().to_lowercase();
        text.contains("view") && text.contains("read")
    })
}

pub(crate) fn cell_text(cell: ElementRef<'_>) -> String {
    let joined: String = cell.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_known_class_table() {
        let html = r#"
            <table class="ji">
              <thead><tr><th>Date</th><th>Title</th><th>Views</th><th>Reads</th><th>Earnings</th></tr></thead>
              <tbody>
                <tr><td><div>Jul 2025</div></td><td><h2>My First Story</h2></td><td>1,234</td><td>567</td><td>$2.10</td></tr>
                <tr><td><div>Jun 2025</div></td><td><h2>Another One</h2></td><td>88</td><td>0</td><td>--</td></tr>
              </tbody>
            </table>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "My First Story");
        assert_eq!(records[0].views, Some(1234));
        assert_eq!(records[1].reads, Some(0), "rendered 0 is present, not absent");
        assert_eq!(records[0].source, "table");
    }

    #[test]
    fn falls_back_to_generic_table_with_view_and_read_text() {
        let html = r#"
            <table><tr><td>Unrelated</td><td>layout table</td></tr></table>
            <table>
              <tr><th>Title</th><th>Views</th><th>Reads</th></tr>
              <tr><td>Generic Story</td><td>42</td><td>7</td></tr>
            </table>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Generic Story");
        assert_eq!(records[0].views, Some(42));
    }

    #[test]
    fn ignores_tables_without_stats_vocabulary() {
        let html = "<table><tr><td>nav</td><td>links</td></tr></table>";
        assert!(extract(html).is_none());
    }

    #[test]
    fn nested_markup_in_cells_is_flattened() {
        let html = r#"
            <table class="stats-table">
              <tr><td><div>Jul  2025</div></td><td><h2>Split <em>Title</em></h2></td><td>10</td><td>5</td></tr>
            </table>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records[0].title, "Split Title");
        assert_eq!(records[0].date.as_deref(), Some("Jul 2025"));
    }
}
