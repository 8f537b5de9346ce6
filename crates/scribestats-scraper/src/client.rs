//! HTTP client for the content-hosting site.
//!
//! Authentication is inherited from the user's existing browser session: the
//! caller supplies the session cookie value and every request carries it.
//! There is no login flow here.

use std::time::Duration;

use reqwest::header;
use reqwest::Client;

use crate::error::ScrapeError;

/// Path of the personal analytics dashboard.
pub const DASHBOARD_PATH: &str = "/me/stats";
/// Path of the partner-program earnings summary.
pub const EARNINGS_PATH: &str = "/me/partner-program/earnings";
/// Path of the JSON query endpoint.
pub const QUERY_PATH: &str = "/_/graphql";

pub struct StatsClient {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl StatsClient {
    /// Creates a client with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session_cookie: Option<String>,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session_cookie.is_some()
    }

    /// Fetch an HTML page relative to the base URL.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Http`] — network failure.
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx response.
    pub async fn fetch_page(&self, path: &str) -> Result<String, ScrapeError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml");
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }

    /// POST a JSON body to the site's query endpoint and parse the response
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StatsClient::fetch_page`].
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ScrapeError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}
