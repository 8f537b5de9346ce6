//! Shared column logic for the table-shaped tiers.
//!
//! A header row, when present, is parsed into a column→field mapping by
//! case-insensitive substring match. Headerless tables fall back to the
//! positional assumptions the dashboard has historically used.

use scribestats_core::numbers::{first_currency, is_count_like, parse_suffixed_count};
use scribestats_core::{ArticleRecord, Earnings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Date,
    Title,
    Views,
    Reads,
    Earnings,
}

/// Positional fallback when no header row is recognized:
/// 0=date, 1=title, 2=views, 3=reads, 4=earnings.
const POSITIONAL: [Column; 5] = [
    Column::Date,
    Column::Title,
    Column::Views,
    Column::Reads,
    Column::Earnings,
];

fn map_header_cell(cell: &str) -> Option<Column> {
    let lower = cell.to_lowercase();
    if lower.contains("date") || lower.contains("published") {
        Some(Column::Date)
    } else if lower.contains("title") {
        Some(Column::Title)
    } else if lower.contains("view") {
        Some(Column::Views)
    } else if lower.contains("read") {
        Some(Column::Reads)
    } else if lower.contains("earning") {
        Some(Column::Earnings)
    } else {
        None
    }
}

fn map_header(cells: &[String]) -> Vec<Option<Column>> {
    cells.iter().map(|c| map_header_cell(c)).collect()
}

/// A row reads as a header when at least two cells map to known fields.
/// One match alone is too weak: a body row titled "My views on testing"
/// would otherwise qualify.
fn looks_like_header(cells: &[String]) -> bool {
    map_header(cells).iter().flatten().count() >= 2
}

fn record_from_cells(
    cells: &[String],
    mapping: &[Option<Column>],
    source: &str,
) -> Option<ArticleRecord> {
    let mut record = ArticleRecord {
        id: None,
        title: String::new(),
        date: None,
        views: None,
        reads: None,
        fans: 0,
        claps: 0,
        comments: 0,
        earnings: Earnings::Unavailable,
        source: source.to_string(),
    };

    for (cell, column) in cells.iter().zip(mapping) {
        let text = cell.trim();
        match column {
            Some(Column::Date) => {
                if !text.is_empty() {
                    record.date = Some(text.to_string());
                }
            }
            Some(Column::Title) => record.title = text.to_string(),
            // "--" and blank cells stay None: not-found is distinct from 0.
            Some(Column::Views) => record.views = parse_suffixed_count(text),
            Some(Column::Reads) => record.reads = parse_suffixed_count(text),
            Some(Column::Earnings) => {
                if let Some(amount) = first_currency(text) {
                    record.earnings = Earnings::Amount(amount);
                }
            }
            None => {}
        }
    }

    record.is_valid().then_some(record)
}

/// Last-resort row reading when neither the header mapping nor the
/// positional assumptions hold: the longest non-numeric cell is the title,
/// count-like cells in row order are views then reads, the first
/// `$`-prefixed cell is the earnings.
fn record_from_scan(cells: &[String], source: &str) -> Option<ArticleRecord> {
    let mut record = ArticleRecord {
        id: None,
        title: String::new(),
        date: None,
        views: None,
        reads: None,
        fans: 0,
        claps: 0,
        comments: 0,
        earnings: Earnings::Unavailable,
        source: source.to_string(),
    };

    for cell in cells {
        let text = cell.trim();
        if text.is_empty() {
            continue;
        }
        if is_count_like(text) {
            if record.views.is_none() {
                record.views = parse_suffixed_count(text);
            } else if record.reads.is_none() {
                record.reads = parse_suffixed_count(text);
            }
        } else if let Some(amount) = first_currency(text) {
            if record.earnings == Earnings::Unavailable {
                record.earnings = Earnings::Amount(amount);
            }
        } else if text.chars().count() > record.title.chars().count() {
            record.title = text.to_string();
        }
    }

    record.is_valid().then_some(record)
}

/// Turn extracted row texts into records: the first row that looks like a
/// header supplies the mapping, otherwise every row is read positionally,
/// degrading to a per-row numeric scan when the positions do not line up.
/// Returns `None` when no valid record remains, so the cascade moves on.
pub(crate) fn records_from_rows(
    rows: &[Vec<String>],
    source: &str,
) -> Option<Vec<ArticleRecord>> {
    let mut iter = rows.iter().filter(|r| !r.is_empty());
    let first = iter.next()?;

    let (mapping, body): (Vec<Option<Column>>, Vec<&Vec<String>>) = if looks_like_header(first) {
        (map_header(first), iter.collect())
    } else {
        let positional = POSITIONAL.iter().copied().map(Some).collect();
        (positional, std::iter::once(first).chain(iter).collect())
    };

    let records: Vec<ArticleRecord> = body
        .into_iter()
        .filter_map(|cells| {
            record_from_cells(cells, &mapping, source)
                .or_else(|| record_from_scan(cells, source))
        })
        .collect();

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn header_mapping_is_case_insensitive_substring() {
        let header = row(&["Published on", "Story Title", "Total Views", "Reads", "Earnings"]);
        assert!(looks_like_header(&header));
        let mapped = map_header(&header);
        assert_eq!(
            mapped,
            vec![
                Some(Column::Date),
                Some(Column::Title),
                Some(Column::Views),
                Some(Column::Reads),
                Some(Column::Earnings)
            ]
        );
    }

    #[test]
    fn single_keyword_row_is_not_a_header() {
        assert!(!looks_like_header(&row(&["My views on testing", "1234"])));
    }

    #[test]
    fn headered_rows_follow_the_mapping() {
        let rows = vec![
            row(&["Title", "Reads", "Views"]),
            row(&["Backwards Columns", "40", "100"]),
        ];
        let records = records_from_rows(&rows, "table").unwrap();
        assert_eq!(records[0].title, "Backwards Columns");
        assert_eq!(records[0].views, Some(100));
        assert_eq!(records[0].reads, Some(40));
    }

    #[test]
    fn headerless_rows_use_positional_assumptions() {
        let rows = vec![row(&["Jul 2025", "A Story", "1,200", "300", "$1.50"])];
        let records = records_from_rows(&rows, "table").unwrap();
        let r = &records[0];
        assert_eq!(r.date.as_deref(), Some("Jul 2025"));
        assert_eq!(r.title, "A Story");
        assert_eq!(r.views, Some(1200));
        assert_eq!(r.reads, Some(300));
        assert_eq!(r.earnings, Earnings::Amount("$1.50".to_string()));
    }

    #[test]
    fn dash_cells_stay_absent_not_zero() {
        let rows = vec![row(&["Jul 2025", "A Story", "--", "300", "--"])];
        let records = records_from_rows(&rows, "table").unwrap();
        assert_eq!(records[0].views, None);
        assert_eq!(records[0].reads, Some(300));
        assert_eq!(records[0].earnings, Earnings::Unavailable);
    }

    #[test]
    fn misaligned_rows_fall_back_to_numeric_scan() {
        // Two cells cannot satisfy the positional layout; the scan picks the
        // count and the longest text cell instead.
        let rows = vec![row(&["A Story With A Long Title", "1,200"])];
        let records = records_from_rows(&rows, "table").unwrap();
        assert_eq!(records[0].title, "A Story With A Long Title");
        assert_eq!(records[0].views, Some(1200));
        assert_eq!(records[0].reads, None);
    }

    #[test]
    fn scan_orders_counts_and_finds_currency() {
        let rows = vec![row(&["", "", "Scanned Story", "90", "30", "$2.10"])];
        let records = records_from_rows(&rows, "table").unwrap();
        let r = &records[0];
        assert_eq!(r.title, "Scanned Story");
        assert_eq!(r.views, Some(90));
        assert_eq!(r.reads, Some(30));
        assert_eq!(r.earnings, Earnings::Amount("$2.10".to_string()));
    }

    #[test]
    fn rows_without_any_count_are_dropped() {
        let rows = vec![
            row(&["Jul 2025", "No Numbers Here", "--", "--", ""]),
            row(&["Aug 2025", "Countable", "10", "5", ""]),
        ];
        let records = records_from_rows(&rows, "table").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Countable");
    }

    #[test]
    fn all_invalid_rows_is_a_miss() {
        let rows = vec![row(&["Jul 2025", "No Numbers Here", "--", "--", ""])];
        assert!(records_from_rows(&rows, "table").is_none());
    }
}
