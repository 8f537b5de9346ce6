//! Per-article enrichment: fans, claps, and comment counts scraped from each
//! article's own page.
//!
//! The dashboard only exposes views and reads. Engagement numbers live on the
//! article pages, so enrichment fetches each one sequentially with a polite
//! inter-request delay and fills the counts in. An article whose page cannot
//! be fetched or parsed keeps its zero counts; enrichment never discards a
//! record.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use scribestats_core::numbers::{parse_count, parse_suffixed_count};
use scribestats_core::ArticleRecord;

use crate::client::StatsClient;

static FANS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,]*)\s*fans?\b").expect("valid regex"));
static CLAPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,.]*[Kk]?)\s*claps?\b").expect("valid regex"));
static COMMENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,]*)\s*(?:responses?|comments?)\b").expect("valid regex")
});
static ATTR_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9][0-9,.]*[Kk]?)").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub fans: u64,
    pub claps: u64,
    pub comments: u64,
}

/// Pulls engagement counts out of an article page.
///
/// Structured markup is preferred (`data-test-id` hooks, clap button
/// `aria-label`s), with free-text regex fallbacks for each count. Anything
/// that cannot be found stays zero.
#[must_use]
pub fn parse_engagement(html: &str) -> Engagement {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");

    let fans_selector = Selector::parse(r#"[data-test-id="fansCount"]"#).expect("valid selector");
    let fans = document
        .select(&fans_selector)
        .find_map(|el| parse_count(&el.text().collect::<String>()))
        .or_else(|| {
            FANS_RE
                .captures(&text)
                .and_then(|caps| parse_count(&caps[1]))
        })
        .unwrap_or(0);

    let labeled = Selector::parse("[aria-label]").expect("valid selector");
    let claps = document
        .select(&labeled)
        .filter_map(|el| el.value().attr("aria-label"))
        .filter(|label| label.to_lowercase().contains("clap"))
        .find_map(|label| {
            ATTR_COUNT_RE
                .captures(label)
                .and_then(|caps| parse_suffixed_count(&caps[1]))
        })
        .or_else(|| {
            CLAPS_RE
                .captures(&text)
                .and_then(|caps| parse_suffixed_count(&caps[1]))
        })
        .unwrap_or(0);

    let comments = COMMENTS_RE
        .captures(&text)
        .and_then(|caps| parse_count(&caps[1]))
        .unwrap_or(0);

    Engagement {
        fans,
        claps,
        comments,
    }
}

/// Fetches each article's page and fills in its engagement counts.
///
/// Requests run sequentially with `delay_ms` between them. Articles without
/// an id cannot be resolved to a page and are passed through untouched, as
/// are articles whose fetch fails.
pub async fn enrich_articles(
    client: &StatsClient,
    mut articles: Vec<ArticleRecord>,
    delay_ms: u64,
) -> Vec<ArticleRecord> {
    let mut first = true;
    for article in &mut articles {
        let Some(id) = article.id.clone() else {
            tracing::debug!(title = %article.title, "article has no id, skipping enrichment");
            continue;
        };

        if !first && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        first = false;

        match client.fetch_page(&format!("/p/{id}")).await {
            Ok(html) => {
                let engagement = parse_engagement(&html);
                article.fans = engagement.fans;
                article.claps = engagement.claps;
                article.comments = engagement.comments;
            }
            Err(err) => {
                tracing::warn!(article_id = %id, error = %err, "enrichment fetch failed");
            }
        }
    }
    articles
}
