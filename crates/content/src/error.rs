use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("content request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("content request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("content fragment unavailable: {0}")]
    Unavailable(String),
    #[error("invalid sanitizer pattern: {0}")]
    Pattern(#[from] regex::Error),
}
