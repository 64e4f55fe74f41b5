use ::scraper::error::SelectorErrorKind;
use std::path::PathBuf;

/// All errors that can occur while crawling and storing VLR data.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A page path could not be joined onto the base URL.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// The relational store rejected a statement or could not be opened.
    #[error("store error: {0}")]
    Store(#[from] duckdb::Error),

    /// Reading or writing a match document failed.
    #[error("document store io error at {path}: {source}")]
    DocumentIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A match document could not be encoded.
    #[error("failed to encode document: {0}")]
    DocumentEncode(#[from] serde_json::Error),

    /// Configuration sources could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A required configuration value is absent.
    #[error("missing required configuration value {0}")]
    MissingConfig(&'static str),
}

impl IngestError {
    /// Whether the error should stop the whole run rather than a single split.
    pub fn is_fatal(&self) -> bool {
        matches!(self, IngestError::Config(_) | IngestError::MissingConfig(_))
    }
}

impl<'a> From<SelectorErrorKind<'a>> for IngestError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        IngestError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
