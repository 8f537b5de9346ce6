//! HTTP layer: authenticated page fetches against the content-hosting site,
//! per-article enrichment, earnings scraping, and the secondary search
//! flows (tags, authors, publications, trending).
//!
//! Every parse here targets an unversioned, unstable external document, so
//! all of them are defensive: selector heuristics layered over regex
//! fallbacks, degrading to defaults instead of erroring.

pub mod client;
pub mod earnings;
pub mod enrich;
pub mod error;
pub mod search;

pub use client::StatsClient;
pub use earnings::{apply_earnings, fetch_article_earnings, parse_earnings_table};
pub use enrich::{enrich_articles, parse_engagement, Engagement};
pub use error::ScrapeError;
pub use search::{
    fetch_author_profile, parse_publication_page, parse_tag_page, parse_trending_page,
    slugify_tag, AuthorPost, AuthorProfile, PublicationSummary, TagStory, TrendingStory,
};
