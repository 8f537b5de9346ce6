//! Durable append-only history logging and trend derivation.
//!
//! Each metric category is a named log: a JSON array file of
//! `{timestamp, data}` entries under a data directory. Snapshots are
//! appended, never rewritten — the only whole-log mutation is an explicit,
//! validated import.

mod error;
mod growth;
mod history;
mod milestone;
mod settings;

pub use error::StoreError;
pub use growth::{GrowthPoint, GrowthSeries};
pub use history::HistoryStore;
pub use settings::Settings;

/// Log name for personal dashboard snapshots.
pub const PERSONAL_STATS: &str = "personal_stats";
/// Log name for tag search results.
pub const TAG_TRENDS: &str = "tag_trends";
/// Log name for author lookup results.
pub const AUTHOR_STATS: &str = "author_stats";
/// Generic stats history log.
pub const STATS_HISTORY: &str = "stats_history";
