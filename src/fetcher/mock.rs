//! In-memory `HttpClient` serving canned answers and recording every request.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{BotError, Result};
use crate::fetcher::{HttpClient, HttpResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

enum Reply {
    Response(HttpResponse),
    Fail(String),
}

#[derive(Default)]
pub struct MockHttpClient {
    replies: Mutex<HashMap<(&'static str, String), Reply>>,
    requests: Mutex<Vec<Request>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert("GET", url, Reply::Response(HttpResponse::ok(body)))
    }

    pub fn on_get_status(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let response = HttpResponse {
            status,
            body: body.into(),
        };
        self.insert("GET", url, Reply::Response(response))
    }

    pub fn on_get_error(self, url: &str, message: &str) -> Self {
        self.insert("GET", url, Reply::Fail(message.to_string()))
    }

    pub fn on_post(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert("POST", url, Reply::Response(HttpResponse::ok(body)))
    }

    fn insert(self, method: &'static str, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, url.to_string()), reply);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn answer(&self, method: &'static str, url: &str, body: Option<String>) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(Request {
            method,
            url: url.to_string(),
            body,
        });

        match self.replies.lock().unwrap().get(&(method, url.to_string())) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::Fail(message)) => Err(BotError::Other(message.clone())),
            None => Err(BotError::Other(format!("unexpected {method} {url}"))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.answer("GET", url, None)
    }

    async fn post(&self, url: &str, _content_type: &str, body: Vec<u8>) -> Result<HttpResponse> {
        self.answer("POST", url, Some(String::from_utf8_lossy(&body).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests_in_order() {
        let mock = MockHttpClient::new()
            .on_get("https://a.test/", "a")
            .on_post("https://b.test/", "{}");

        let got = tokio_test::block_on(mock.get("https://a.test/")).unwrap();
        tokio_test::block_on(mock.post("https://b.test/", "application/json", b"{\"q\":1}".to_vec()))
            .unwrap();

        assert_eq!(got.text(), "a");
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[1].body.as_deref(), Some("{\"q\":1}"));
    }

    #[test]
    fn test_unknown_request_fails() {
        let mock = MockHttpClient::new();

        let err = tokio_test::block_on(mock.get("https://nowhere.test/")).unwrap_err();

        assert_eq!(err.to_string(), "unexpected GET https://nowhere.test/");
        assert_eq!(mock.request_count(), 1);
    }
}
