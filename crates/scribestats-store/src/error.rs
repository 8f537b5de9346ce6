use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error accessing history log: {0}")]
    Io(#[from] std::io::Error),

    #[error("history log is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    /// Import payloads are rejected before any write, so storage is
    /// untouched when this fires.
    #[error("import rejected: {reason}")]
    InvalidImport { reason: String },
}
