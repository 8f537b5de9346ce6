//! Secondary lookups: tag trends, author profiles, publication summaries,
//! and homepage trending stories.
//!
//! The author lookup goes through the site's JSON query endpoint; everything
//! else scrapes public HTML with the same degrade-to-defaults posture as the
//! extraction tiers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use scribestats_core::numbers::parse_suffixed_count;
use serde::Serialize;

use crate::client::{StatsClient, QUERY_PATH};
use crate::error::ScrapeError;

const AUTHOR_QUERY: &str = "\
query UserProfile($username: ID!) {
    user(username: $username) {
        id
        name
        bio
        postsConnection(first: 20) {
            edges {
                node {
                    id
                    title
                }
            }
        }
    }
}";

const TRENDING_LIMIT: usize = 10;

// Follower elements render the count inside label text, e.g. "12,400
// Followers" or "2.5K Followers".
static LEADING_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9][0-9,.]*[Kk]?)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStory {
    pub title: String,
    pub author: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPost {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub username: String,
    pub name: String,
    pub posts: Vec<AuthorPost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationSummary {
    pub followers: Option<u64>,
    pub articles: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingStory {
    pub title: String,
    pub author: String,
    pub link: String,
}

/// Normalizes free-form tag input into the URL slug form: trimmed,
/// lowercased, runs of whitespace collapsed to single hyphens.
#[must_use]
pub fn slugify_tag(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn resolve_link(href: &str, base_url: &str) -> String {
    let absolute = if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{base_url}{href}")
    };
    // tracking query suffix
    match absolute.find("?source=") {
        Some(idx) => absolute[..idx].to_string(),
        None => absolute,
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a tag page into its listed stories.
///
/// Each `<article>` contributes one story: `<h2>` text as the title, the
/// first author link as the author, and the nearest enclosing or contained
/// link resolved against `base_url`.
#[must_use]
pub fn parse_tag_page(html: &str, base_url: &str) -> Vec<TagStory> {
    let document = Html::parse_document(html);
    let article_selector = Selector::parse("article").expect("valid selector");
    let title_selector = Selector::parse("h2").expect("valid selector");
    let author_selector = Selector::parse(r#"p a[href*="/@"]"#).expect("valid selector");
    let link_selector = Selector::parse("a[href]").expect("valid selector");

    let mut stories = Vec::new();
    for article in document.select(&article_selector) {
        let Some(title_el) = article.select(&title_selector).next() else {
            continue;
        };
        let title = element_text(title_el);
        if title.is_empty() {
            continue;
        }

        let author = article
            .select(&author_selector)
            .next()
            .map(element_text)
            .unwrap_or_else(|| "Unknown Author".to_string());

        let link = title_el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|el| {
                (el.value().name() == "a")
                    .then(|| el.value().attr("href"))
                    .flatten()
            })
            .or_else(|| {
                article
                    .select(&link_selector)
                    .find_map(|el| el.value().attr("href"))
            })
            .map_or_else(|| "#".to_string(), |href| resolve_link(href, base_url));

        stories.push(TagStory {
            title,
            author,
            link,
        });
    }
    stories
}

/// Looks up an author's recent posts via the JSON query endpoint.
///
/// A leading `@` on the username is stripped.
///
/// # Errors
///
/// - [`ScrapeError::Api`] — the endpoint returned an error payload.
/// - [`ScrapeError::UserNotFound`] — the username resolved to no user.
/// - Plus the transport errors of [`StatsClient::post_json`].
pub async fn fetch_author_profile(
    client: &StatsClient,
    username: &str,
) -> Result<AuthorProfile, ScrapeError> {
    let username = username.trim().trim_start_matches('@').to_string();
    let body = serde_json::json!({
        "query": AUTHOR_QUERY,
        "variables": { "username": username },
    });
    let response = client.post_json(QUERY_PATH, &body).await?;

    if let Some(message) = response["errors"][0]["message"].as_str() {
        return Err(ScrapeError::Api {
            message: message.to_string(),
        });
    }
    let user = &response["data"]["user"];
    if user.is_null() {
        return Err(ScrapeError::UserNotFound { username });
    }

    let name = user["name"].as_str().unwrap_or(&username).to_string();
    let posts = user["postsConnection"]["edges"]
        .as_array()
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| {
                    let node = &edge["node"];
                    Some(AuthorPost {
                        id: node["id"].as_str()?.to_string(),
                        title: node["title"].as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(AuthorProfile {
        username,
        name,
        posts,
    })
}

/// Parses a publication's public page into a follower count and article
/// count. Follower count is `None` when no recognizable element is present.
#[must_use]
pub fn parse_publication_page(html: &str) -> PublicationSummary {
    let document = Html::parse_document(html);
    let followers_selector =
        Selector::parse(r#"[data-testid="followersCount"], a[href$="/followers"]"#)
            .expect("valid selector");
    let article_selector = Selector::parse("article").expect("valid selector");

    let followers = document.select(&followers_selector).find_map(|el| {
        LEADING_COUNT_RE
            .captures(&element_text(el))
            .and_then(|caps| parse_suffixed_count(&caps[1]))
    });
    let articles = document.select(&article_selector).count();

    PublicationSummary {
        followers,
        articles,
    }
}

/// Parses the site homepage into its top trending stories, capped at ten.
///
/// Story titles are `<h2>` elements; the link is found by climbing ancestors
/// for an `<a>` whose href contains `/p/`, and the author is the first span
/// or author link next to the title. Titles without a link are skipped.
#[must_use]
pub fn parse_trending_page(html: &str, base_url: &str) -> Vec<TrendingStory> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("h2").expect("valid selector");
    let author_selector = Selector::parse("span, a").expect("valid selector");

    let mut stories = Vec::new();
    for title_el in document.select(&title_selector) {
        if stories.len() >= TRENDING_LIMIT {
            break;
        }
        let title = element_text(title_el);
        if title.is_empty() {
            continue;
        }

        let Some(href) = title_el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|el| {
                (el.value().name() == "a")
                    .then(|| el.value().attr("href"))
                    .flatten()
                    .filter(|href| href.contains("/p/"))
            })
        else {
            continue;
        };

        let author = title_el
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.select(&author_selector).next())
            .map(element_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "--".to_string());

        stories.push(TrendingStory {
            title,
            author,
            link: resolve_link(href, base_url),
        });
    }
    stories
}
