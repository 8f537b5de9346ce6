//! Bounded observation window for asynchronously-rendered dashboards.
//!
//! The underlying page may render its stats after load, so a single
//! extraction pass can miss. Instead of an ambient mutation-observer
//! lifecycle, this is an explicit poll: re-fetch the document and re-run the
//! cascade on a fixed interval until something extracts or the window
//! closes. Reports "not found" rather than hanging indefinitely.

use std::future::Future;
use std::time::Duration;

use scribestats_core::StatsResponse;

use crate::extract_response;

/// Repeatedly fetch a document and run the extraction cascade until records
/// appear or `timeout` elapses.
///
/// `fetch_document` returning `None` (a failed fetch) counts as a miss for
/// that attempt; the poll keeps going until the deadline. The final response
/// on timeout is the last extraction attempt, with an error message when no
/// attempt produced records.
pub async fn await_stats<F, Fut>(
    mut fetch_document: F,
    timeout: Duration,
    interval: Duration,
) -> StatsResponse
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    let mut last = StatsResponse::default();

    loop {
        if let Some(html) = fetch_document().await {
            let response = extract_response(&html);
            if !response.is_empty() {
                return response;
            }
            last = response;
        }

        if tokio::time::Instant::now() + interval > deadline {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    tracing::warn!(
        timeout_secs = timeout.as_secs(),
        "observation window elapsed without extractable stats"
    );
    if last.error.is_none() {
        last.error = Some("no article statistics found within the observation window".to_string());
    }
    last
}
