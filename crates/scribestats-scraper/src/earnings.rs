//! Partner-program earnings, joined onto article records by title prefix.
//!
//! The earnings page lists per-story amounts keyed by title, but its titles
//! are sometimes truncated with an ellipsis. Matching therefore compares only
//! the first [`TITLE_MATCH_PREFIX_CHARS`] characters of each title.

use std::collections::HashMap;

use scraper::{Html, Selector};
use scribestats_core::numbers::first_currency;
use scribestats_core::{ArticleRecord, Earnings};

use crate::client::{StatsClient, EARNINGS_PATH};

/// Number of leading characters compared when joining earnings rows to
/// articles by title.
pub const TITLE_MATCH_PREFIX_CHARS: usize = 20;

fn title_prefix(title: &str) -> String {
    title.trim().chars().take(TITLE_MATCH_PREFIX_CHARS).collect()
}

/// Parses the earnings page into a title -> amount map.
///
/// Each table row with at least two cells contributes an entry: the first
/// cell is the story title, the first currency amount anywhere in the row is
/// its earnings. Rows without a currency amount are skipped.
#[must_use]
pub fn parse_earnings_table(html: &str) -> HashMap<String, String> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tr").expect("valid selector");
    let cell_selector = Selector::parse("td, th").expect("valid selector");

    let mut earnings = HashMap::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| {
                cell.text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        if cells.len() < 2 {
            continue;
        }
        let title = cells[0].trim();
        if title.is_empty() {
            continue;
        }
        let row_text = cells[1..].join(" ");
        if let Some(amount) = first_currency(&row_text) {
            earnings.insert(title.to_string(), amount);
        }
    }
    earnings
}

/// Fills in earnings on articles whose title prefix matches an earnings row.
///
/// Articles without a match keep their existing earnings value; a parsed
/// earnings map never downgrades an amount to unavailable.
pub fn apply_earnings(articles: &mut [ArticleRecord], earnings: &HashMap<String, String>) {
    for article in articles.iter_mut() {
        let prefix = title_prefix(&article.title);
        if prefix.is_empty() {
            continue;
        }
        let matched = earnings
            .iter()
            .find(|(title, _)| title_prefix(title) == prefix);
        if let Some((_, amount)) = matched {
            article.earnings = Earnings::Amount(amount.clone());
        }
    }
}

/// Fetches and parses the earnings page.
///
/// Earnings are an optional decoration on the stats flow, so any failure is
/// logged and an empty map returned rather than propagated.
pub async fn fetch_article_earnings(client: &StatsClient) -> HashMap<String, String> {
    match client.fetch_page(EARNINGS_PATH).await {
        Ok(html) => parse_earnings_table(&html),
        Err(err) => {
            tracing::warn!(error = %err, "earnings fetch failed, amounts stay unavailable");
            HashMap::new()
        }
    }
}
