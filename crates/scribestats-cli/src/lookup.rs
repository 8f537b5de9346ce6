//! Secondary lookup commands: tag trends, author profiles, publication
//! summaries, and homepage trending. Tag and author results are appended to
//! their history logs so growth can be derived later.

use scribestats_core::AppConfig;
use scribestats_scraper::{
    fetch_author_profile, parse_publication_page, parse_tag_page, parse_trending_page,
    slugify_tag, StatsClient,
};
use scribestats_store::{HistoryStore, AUTHOR_STATS, TAG_TRENDS};

fn build_client(config: &AppConfig) -> anyhow::Result<StatsClient> {
    // Public pages, so the session cookie is passed along when present but
    // not required.
    StatsClient::new(
        &config.base_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.session_cookie.clone(),
    )
    .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

pub(crate) async fn run_tag(
    config: &AppConfig,
    store: &HistoryStore,
    tag: &str,
) -> anyhow::Result<()> {
    let slug = slugify_tag(tag);
    if slug.is_empty() {
        anyhow::bail!("empty tag");
    }

    let client = build_client(config)?;
    let html = client.fetch_page(&format!("/tag/{slug}")).await?;
    let stories = parse_tag_page(&html, client.base_url());
    if stories.is_empty() {
        anyhow::bail!("no articles found for tag '{slug}'; the page layout may have changed");
    }

    println!("top stories in '{slug}':");
    for story in &stories {
        println!("  {} (by {})", story.title, story.author);
        println!("    {}", story.link);
    }

    store.append(
        TAG_TRENDS,
        serde_json::json!({ "tag": slug, "articles": stories }),
    )?;
    Ok(())
}

pub(crate) async fn run_author(
    config: &AppConfig,
    store: &HistoryStore,
    username: &str,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let profile = fetch_author_profile(&client, username).await?;

    println!("recent articles by {}:", profile.name);
    for post in &profile.posts {
        println!("  {} ({}/p/{})", post.title, client.base_url(), post.id);
    }

    store.append(
        AUTHOR_STATS,
        serde_json::json!({ "username": profile.username, "posts": profile.posts }),
    )?;
    Ok(())
}

pub(crate) async fn run_publication(config: &AppConfig, publication: &str) -> anyhow::Result<()> {
    let slug = publication.trim().trim_start_matches('/');
    if slug.is_empty() {
        anyhow::bail!("empty publication name");
    }

    let client = build_client(config)?;
    let html = client.fetch_page(&format!("/{slug}")).await?;
    let summary = parse_publication_page(&html);

    match summary.followers {
        Some(followers) => println!("followers: {followers}"),
        None => println!("followers: --"),
    }
    println!("articles on page: {}", summary.articles);
    Ok(())
}

pub(crate) async fn run_trending(config: &AppConfig) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let html = client.fetch_page("/").await?;
    let stories = parse_trending_page(&html, client.base_url());
    if stories.is_empty() {
        anyhow::bail!("no trending stories found; the homepage layout may have changed");
    }

    for story in &stories {
        println!("{} (by {})", story.title, story.author);
        println!("  {}", story.link);
    }
    Ok(())
}
