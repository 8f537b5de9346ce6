//! The refresh pipeline: obtain dashboard HTML, run the extraction cascade,
//! enrich, aggregate, notify, persist.
//!
//! Live fetches poll inside a bounded observation window because the
//! dashboard renders its stats asynchronously. A saved HTML file via
//! `--input` gets a single extraction pass and skips the network-dependent
//! enrichment steps.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;

use scribestats_core::{
    compute_totals, newly_crossed, next_milestone, sort_for_display, AppConfig, ArticleRecord,
    SortKey, StatsSnapshot,
};
use scribestats_extract::{await_stats, extract_response};
use scribestats_scraper::client::DASHBOARD_PATH;
use scribestats_scraper::{apply_earnings, enrich_articles, fetch_article_earnings, StatsClient};
use scribestats_store::{HistoryStore, PERSONAL_STATS};

pub(crate) async fn run_refresh(
    config: &AppConfig,
    store: &HistoryStore,
    input: Option<&Path>,
    sort: SortKey,
    no_enrich: bool,
) -> anyhow::Result<()> {
    let (response, client) = match input {
        Some(path) => {
            let html = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
            (extract_response(&html), None)
        }
        None => {
            let client = build_live_client(config)?;
            let client_ref = &client;
            let response = await_stats(
                move || async move {
                    match client_ref.fetch_page(DASHBOARD_PATH).await {
                        Ok(html) => Some(html),
                        Err(err) => {
                            tracing::warn!(error = %err, "dashboard fetch failed, retrying until the window closes");
                            None
                        }
                    }
                },
                Duration::from_secs(config.extract_timeout_secs),
                Duration::from_millis(config.extract_poll_interval_ms),
            )
            .await;
            (response, Some(client))
        }
    };

    if response.articles.is_empty() {
        anyhow::bail!(response
            .error
            .unwrap_or_else(|| "no article statistics found".to_string()));
    }

    let mut articles = response.articles;
    if let Some(client) = &client {
        if !no_enrich {
            articles = enrich_articles(client, articles, config.inter_request_delay_ms).await;
            let earnings = fetch_article_earnings(client).await;
            apply_earnings(&mut articles, &earnings);
        }
    }

    let totals = compute_totals(&articles);
    // Snapshots keep extraction order; only the display copy is sorted.
    let snapshot = StatsSnapshot {
        timestamp: Utc::now(),
        follower_count: response.follower_count,
        total_views: totals.views,
        total_reads: totals.reads,
        avg_read_rate: totals.read_rate,
        articles: articles.clone(),
    };
    store.append(PERSONAL_STATS, serde_json::to_value(&snapshot)?)?;

    if store.settings()?.notifications {
        if let Some(milestone) = newly_crossed(totals.views, store.last_milestone_notified()?) {
            println!("Milestone reached: {milestone} total views!");
            store.record_milestone(milestone)?;
        }
    }

    sort_for_display(&mut articles, sort);
    print_report(&snapshot, &articles);
    Ok(())
}

fn build_live_client(config: &AppConfig) -> anyhow::Result<StatsClient> {
    if config.session_cookie.is_none() {
        anyhow::bail!(
            "no dashboard source: set SCRIBESTATS_SESSION_COOKIE for live fetches, \
             or pass --input FILE with saved dashboard HTML"
        );
    }
    StatsClient::new(
        &config.base_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.session_cookie.clone(),
    )
    .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

fn print_report(snapshot: &StatsSnapshot, articles: &[ArticleRecord]) {
    println!(
        "{} articles, {} total views, {} total reads, {:.1}% avg read rate",
        articles.len(),
        snapshot.total_views,
        snapshot.total_reads,
        snapshot.avg_read_rate
    );
    if let Some(followers) = snapshot.follower_count {
        println!("followers: {followers}");
    }
    match next_milestone(snapshot.total_views) {
        Some(next) => println!("next milestone: {next} views"),
        None => println!("all view milestones reached"),
    }
    println!();
    println!(
        "{:<42} {:>8} {:>8} {:>7} {:>6} {:>7} {:>9} {:>10}",
        "Title", "Views", "Reads", "Read%", "Fans", "Claps", "Comments", "Earnings"
    );
    for article in articles {
        println!(
            "{:<42} {:>8} {:>8} {:>6.1}% {:>6} {:>7} {:>9} {:>10}",
            truncate_title(&article.title, 42),
            display_count(article.views),
            display_count(article.reads),
            article.read_rate(),
            article.fans,
            article.claps,
            article.comments,
            article.earnings.to_string(),
        );
    }
}

fn display_count(count: Option<u64>) -> String {
    count.map_or_else(|| "--".to_string(), |n| n.to_string())
}

fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut truncated: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}
