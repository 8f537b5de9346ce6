use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network-level failure. Recoverable: callers surface a retry
    /// affordance rather than treating it as fatal.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("query endpoint returned an error: {message}")]
    Api { message: String },

    #[error("user \"{username}\" not found")]
    UserNotFound { username: String },
}
