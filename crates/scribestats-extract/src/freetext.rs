//! Tier 4: free-text block heuristic, the last resort.
//!
//! When no table shape survives, the stats still appear somewhere in the
//! page text as runs like "Title / View story / 1,234 Views / 567 Reads /
//! $2.10 Earnings". This tier locates the densest text block containing the
//! marker phrases, splits it into per-article segments on the trailing
//! "Earnings" marker, and regex-extracts the fields from each segment.

use regex::Regex;
use scraper::{Html, Selector};

use scribestats_core::numbers::{first_currency, is_count_like, parse_suffixed_count};
use scribestats_core::{ArticleRecord, Earnings};

const MARKERS: [&str; 3] = ["View story", "Reads", "Views"];
const SEGMENT_MARKER: &str = "Earnings";
const STORY_MARKER: &str = "View story";

pub(crate) fn extract(html: &str) -> Option<Vec<ArticleRecord>> {
    let block = densest_stats_block(html)?;

    let records: Vec<ArticleRecord> = block
        .split(SEGMENT_MARKER)
        .filter(|segment| segment.contains(STORY_MARKER))
        .filter_map(record_from_segment)
        .collect();

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// Pick the text block with the highest marker density. Text nodes are
/// joined with newlines so the line structure of the rendered page survives
/// for the title heuristic.
fn densest_stats_block(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let div_sel = Selector::parse("div").expect("valid selector");

    let mut best: Option<(usize, String)> = None;
    for div in doc.select(&div_sel) {
        let text = div
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let score: usize = MARKERS.iter().map(|m| text.matches(m).count()).sum();
        if score >= 2 && best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, text));
        }
    }
    best.map(|(_, text)| text)
}

fn record_from_segment(segment: &str) -> Option<ArticleRecord> {
    let marker_pos = segment.find(STORY_MARKER)?;

    // Title: the longest non-numeric, non-keyword line preceding the marker.
    let title = segment[..marker_pos]
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !is_keyword_line(line)
                && !is_count_like(line)
                && !line.starts_with('$')
        })
        .max_by_key(|line| line.chars().count())?
        .to_string();

    let views = labeled_count(segment, "Views");
    let reads = labeled_count(segment, "Reads");
    let earnings = first_currency(segment).map_or(Earnings::Unavailable, Earnings::Amount);

    let record = ArticleRecord {
        id: None,
        title,
        date: None,
        views,
        reads,
        fans: 0,
        claps: 0,
        comments: 0,
        earnings,
        source: "free_text".to_string(),
    };
    record.is_valid().then_some(record)
}

/// Extract the numeral immediately preceding `label` ("Views" / "Reads").
fn labeled_count(segment: &str, label: &str) -> Option<u64> {
    let re = Regex::new(&format!(r"(?s)([0-9][0-9,\.]*[Kk]?)\s*{label}")).expect("valid regex");
    re.captures(segment)
        .and_then(|cap| parse_suffixed_count(cap.get(1)?.as_str()))
}

fn is_keyword_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    matches!(
        lower.as_str(),
        "view story" | "views" | "reads" | "earnings" | "followers"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div id="app">
          <div class="stats-run">
            <span>My Longest Story Title Yet</span>
            <span>View story</span>
            <span>1,234</span><span>Views</span>
            <span>567</span><span>Reads</span>
            <span>$2.10</span><span>Earnings</span>
            <span>Short One</span>
            <span>View story</span>
            <span>88</span><span>Views</span>
            <span>12</span><span>Reads</span>
            <span>Earnings</span>
          </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn splits_segments_on_earnings_marker() {
        let records = extract(PAGE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "My Longest Story Title Yet");
        assert_eq!(records[0].views, Some(1234));
        assert_eq!(records[0].reads, Some(567));
        assert_eq!(records[0].earnings, Earnings::Amount("$2.10".to_string()));
        assert_eq!(records[1].title, "Short One");
        assert_eq!(records[1].earnings, Earnings::Unavailable);
        assert_eq!(records[1].source, "free_text");
    }

    #[test]
    fn numeric_and_keyword_lines_never_become_titles() {
        let html = r#"
            <div>
              <span>9,999</span>
              <span>Views</span>
              <span>Actual Title</span>
              <span>View story</span>
              <span>10</span><span>Views</span>
              <span>5</span><span>Reads</span>
              <span>Earnings</span>
            </div>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records[0].title, "Actual Title");
    }

    #[test]
    fn sparse_pages_without_markers_miss() {
        assert!(extract("<div><span>Views</span></div>").is_none());
    }

    #[test]
    fn k_suffixed_counts_are_scaled() {
        let html = r#"
            <div>
              <span>Popular Story</span>
              <span>View story</span>
              <span>1.2K</span><span>Views</span>
              <span>300</span><span>Reads</span>
              <span>Earnings</span>
            </div>
        "#;
        let records = extract(html).unwrap();
        assert_eq!(records[0].views, Some(1200));
    }
}
