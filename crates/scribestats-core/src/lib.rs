pub mod config;
pub mod message;
pub mod numbers;
pub mod stats;
pub mod types;

pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use message::{StatsRequest, StatsResponse};
pub use stats::{
    compute_totals, newly_crossed, next_milestone, sort_for_display, SortKey, Totals, MILESTONES,
};
pub use types::{ArticleRecord, Earnings, HistoryEntry, StatsSnapshot};
