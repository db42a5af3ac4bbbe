use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unmarshal {what} failed: {source}")]
    Decode {
        what: String,
        source: serde_json::Error,
    },

    #[error("API returned HTML instead of JSON: {0}")]
    UnexpectedHtml(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("convert html to markdown failed: {0}")]
    Markdown(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{op} failed: {source}")]
    Context {
        op: String,
        source: Box<BotError>,
    },

    #[error("{0}")]
    Other(String),
}

impl BotError {
    /// Wrap the error with the name of the operation that produced it.
    pub fn context(self, op: impl Into<String>) -> Self {
        BotError::Context {
            op: op.into(),
            source: Box::new(self),
        }
    }

    /// True when the error (or any wrapped cause) means "nothing to show".
    pub fn is_not_found(&self) -> bool {
        match self {
            BotError::NotFound(_) => true,
            BotError::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl From<ConfigError> for BotError {
    fn from(e: ConfigError) -> Self {
        BotError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Attach an operation name to the error side of a `Result`.
pub trait ResultExt<T> {
    fn context(self, op: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<BotError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, op: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(op))
    }
}
