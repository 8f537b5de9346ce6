//! Follower-count extraction, independent of the article cascade.
//!
//! Scans for the text block with the most occurrences of "Followers" and
//! reads the adjacent numeral, supporting a `K` suffix meaning ×1000.

use regex::Regex;
use scraper::{Html, Selector};

use scribestats_core::numbers::parse_suffixed_count;

/// Best-effort follower count for the current page, or `None` when the page
/// carries no recognizable follower text.
#[must_use]
pub fn extract_follower_count(html: &str) -> Option<u64> {
    let doc = Html::parse_document(html);
    let div_sel = Selector::parse("div").expect("valid selector");

    let mut best: Option<(usize, String)> = None;
    for div in doc.select(&div_sel) {
        let text: String = div.text().collect::<Vec<_>>().join(" ");
        let count = text.matches("Followers").count();
        if count > 0 && best.as_ref().is_none_or(|(c, _)| count > *c) {
            best = Some((count, text));
        }
    }

    let (_, text) = best?;
    let re = Regex::new(r"([0-9][0-9,\.]*[Kk]?)\s*Followers").expect("valid regex");
    re.captures(&text)
        .and_then(|cap| parse_suffixed_count(cap.get(1)?.as_str()))
}
