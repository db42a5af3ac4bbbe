use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::{HttpClient, HttpResponse};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; LesswrongBot/1.0)";

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for HttpFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json, text/html, */*")
            .send()
            .await?;

        Self::read(response).await
    }

    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<HttpResponse> {
        tracing::debug!(%url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        Self::read(response).await
    }
}
