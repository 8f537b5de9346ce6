//! Domain types for article statistics extraction and history logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel string used for [`Earnings::Unavailable`] in serialized form.
///
/// The analytics site renders earnings in inconsistent currency formats, so
/// amounts are kept as display strings. "Not found" is distinct from a
/// legitimate `$0.00` and must never be coerced to zero.
const UNAVAILABLE: &str = "--";

/// Per-article earnings: either a currency-formatted display string as
/// scraped from the earnings page, or an explicit unavailable marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Earnings {
    Amount(String),
    Unavailable,
}

impl Default for Earnings {
    fn default() -> Self {
        Earnings::Unavailable
    }
}

impl From<String> for Earnings {
    fn from(raw: String) -> Self {
        if raw.is_empty() || raw == UNAVAILABLE {
            Earnings::Unavailable
        } else {
            Earnings::Amount(raw)
        }
    }
}

impl From<Earnings> for String {
    fn from(earnings: Earnings) -> Self {
        match earnings {
            Earnings::Amount(amount) => amount,
            Earnings::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

impl std::fmt::Display for Earnings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Earnings::Amount(amount) => write!(f, "{amount}"),
            Earnings::Unavailable => write!(f, "{UNAVAILABLE}"),
        }
    }
}

/// One content item's statistics, as extracted from the analytics dashboard
/// and optionally enriched from the article's own page.
///
/// `views` and `reads` are `Option` because "value not found on the page" is
/// distinct from "the page showed 0" — absent values must not contribute to
/// aggregate sums. `fans`/`claps`/`comments` come from a secondary per-article
/// fetch and default to 0 when that fetch fails (a tolerated partial failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Site-assigned article ID. Absent for DOM-table extraction paths,
    /// which have no stable id; the title serves as a fallback key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title. Unicode, never executed as markup.
    pub title: String,
    /// Free-form publish period label, e.g. "Jul 2025".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub reads: Option<u64>,
    #[serde(default)]
    pub fans: u64,
    #[serde(default)]
    pub claps: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub earnings: Earnings,
    /// Which extraction tier produced this record.
    ///
    /// One of: `"embedded_state"`, `"table"`, `"aria_table"`, `"free_text"`.
    #[serde(default)]
    pub source: String,
}

impl ArticleRecord {
    /// A record is only usable when it has a non-empty title and at least one
    /// of views/reads numerically present. The extraction cascade discards
    /// records failing this rather than passing them upstream.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && (self.views.is_some() || self.reads.is_some())
    }

    /// Per-article read rate in percent; 0 when views are absent or zero.
    #[must_use]
    pub fn read_rate(&self) -> f64 {
        match (self.views, self.reads) {
            (Some(views), Some(reads)) if views > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let rate = reads as f64 / views as f64 * 100.0;
                rate
            }
            _ => 0.0,
        }
    }
}

/// One timestamped capture of the user's aggregate personal statistics.
///
/// Created once per successful extraction, immutable thereafter, appended to
/// the history store. Articles are kept in extraction order; display sorting
/// happens on a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub follower_count: Option<u64>,
    pub total_views: u64,
    pub total_reads: u64,
    /// Average read rate in percent: Σreads / Σviews × 100, or 0 when Σviews = 0.
    pub avg_read_rate: f64,
    pub articles: Vec<ArticleRecord>,
}

/// One entry in a named append-only history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}
