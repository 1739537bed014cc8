use thiserror::Error;

/// Failures that abort a whole file before any record is written.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unknown file type")]
    UnknownFileType,

    #[error("unavailable parser for {0}")]
    UnavailableParser(String),

    #[error("malformed promotions file: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("couldn't download file from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Why a single parsed entry was skipped. Never surfaced to callers; only
/// logged.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid entry: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("promotion does not have a valid discount")]
    NoDiscount,

    #[error(transparent)]
    Db(#[from] promos_db::DbError),
}
