pub mod http_fetcher;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::app::{BotError, Result};

/// Raw answer of a remote source.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx answer into an error carrying a short body excerpt.
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        Err(BotError::Status {
            url: url.to_string(),
            status: self.status,
            body: excerpt(&self.text()),
        })
    }

    /// Decode a JSON body. Sources sometimes answer with an HTML error page
    /// and a 200 status, which is reported separately from malformed JSON.
    pub fn json<T: DeserializeOwned>(&self, what: &str) -> Result<T> {
        if self.body.first() == Some(&b'<') {
            return Err(BotError::UnexpectedHtml(excerpt(&self.text())));
        }

        serde_json::from_slice(&self.body).map_err(|source| BotError::Decode {
            what: what.to_string(),
            source,
        })
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(200).collect()
}

/// Transport used by every fetch strategy.
///
/// Requests are cancelled by dropping the returned future, so callers bound
/// latency with `tokio::time::timeout`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<HttpResponse>;
}
