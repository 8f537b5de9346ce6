//! Article-statistics extraction from the analytics dashboard page.
//!
//! The source site's markup changes frequently and unpredictably, so
//! extraction tries tiers in strict priority order (embedded state blob,
//! column-mapped table, ARIA-role table, free-text block) and returns the
//! first tier that yields any valid record. Lower-priority tiers never run
//! once one succeeds, so partial results from different heuristics cannot
//! conflict.
//!
//! Every tier is a pure function `&str -> Option<Vec<ArticleRecord>>`,
//! unit-testable against fixture HTML. The cascade itself never errors:
//! exhaustion degrades to an empty response with a diagnostic message.

mod aria;
mod columns;
mod embedded;
mod followers;
mod freetext;
mod poll;
mod table;

pub use followers::extract_follower_count;
pub use poll::await_stats;

use scribestats_core::{ArticleRecord, StatsRequest, StatsResponse};

type Tier = fn(&str) -> Option<Vec<ArticleRecord>>;

/// Cascade tiers in priority order. Tier names are recorded on each
/// extracted record's `source` field.
const TIERS: [(&str, Tier); 4] = [
    ("embedded_state", embedded::extract),
    ("table", table::extract),
    ("aria_table", aria::extract),
    ("free_text", freetext::extract),
];

/// Run the extraction cascade over a page document.
///
/// Returns the first tier's valid records, or an empty vector when every
/// tier misses (logged, not surfaced as an error).
#[must_use]
pub fn extract_articles(html: &str) -> Vec<ArticleRecord> {
    for (name, tier) in TIERS {
        if let Some(records) = tier(html) {
            tracing::debug!(tier = name, count = records.len(), "extraction tier succeeded");
            return records;
        }
    }
    tracing::warn!("all extraction tiers exhausted — page layout may have changed");
    Vec::new()
}

/// Full best-effort extraction: articles plus the independently-scanned
/// follower count. Never fails; an extraction miss is reported through the
/// response's `error` message.
#[must_use]
pub fn extract_response(html: &str) -> StatsResponse {
    let articles = extract_articles(html);
    let follower_count = followers::extract_follower_count(html);
    let error = articles
        .is_empty()
        .then(|| "no article statistics found; the page layout may have changed".to_string());
    StatsResponse {
        articles,
        error,
        follower_count,
    }
}

/// Serve one extraction request from the aggregator.
#[must_use]
pub fn handle_request(request: StatsRequest, html: &str) -> StatsResponse {
    match request {
        StatsRequest::RequestStats => extract_response(html),
    }
}
