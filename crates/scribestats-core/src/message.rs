//! The asynchronous message contract between the aggregator and the
//! extractor.
//!
//! The extractor never errors past this boundary: internal failures degrade
//! to an empty article list (plus a diagnostic log entry), and the caller
//! decides how to present "no data".

use serde::{Deserialize, Serialize};

use crate::types::ArticleRecord;

/// Request sent to the page hosting the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatsRequest {
    #[serde(rename = "REQUEST_STATS")]
    RequestStats,
}

/// Best-effort extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub articles: Vec<ArticleRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

impl StatsResponse {
    /// An extraction miss: the cascade was exhausted with no records. This is
    /// an empty-result condition, distinct from a transport failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
