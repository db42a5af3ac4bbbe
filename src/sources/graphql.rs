use std::fmt::Write;

use chrono::{Duration, NaiveDate, Utc};

use crate::app::{BotError, Result, ResultExt};
use crate::domain::{GraphqlPost, GraphqlResponse, PostDetail, DEFAULT_LIMIT};
use crate::fetcher::HttpClient;

pub const GRAPHQL_URL: &str = "https://www.lesswrong.com/graphql";

/// Approximate number of posts on the site; random offsets are drawn below it.
pub const POSTS_MAX_COUNT: usize = 25000;

/// How far back the weekly top list looks.
pub const TOP_WINDOW_DAYS: i64 = 7;

/// A forum read through its GraphQL API. It has no listing to cache: a random
/// post is the single newest-first result at a random offset.
pub struct GraphqlSource {
    name: &'static str,
    base_url: String,
    endpoint: String,
}

impl GraphqlSource {
    pub fn new(name: &'static str, base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn random_query(offset: usize) -> String {
        format!(
            r#"{{
  posts(input: {{terms: {{view: "new", limit: 1, meta: null, offset: {offset}}}}}) {{
    results {{
      title
      pageUrl
      htmlBody
    }}
  }}
}}"#
        )
    }

    pub fn top_query(after: NaiveDate) -> String {
        format!(
            r#"{{
  posts(input: {{terms: {{view: "top", limit: {DEFAULT_LIMIT}, meta: null, after: "{}"}}}}) {{
    results {{
      title
      pageUrl
      user {{
        displayName
      }}
    }}
  }}
}}"#,
            after.format("%Y-%m-%d")
        )
    }

    /// Start of the weekly top window.
    pub fn top_cutoff() -> NaiveDate {
        (Utc::now() - Duration::days(TOP_WINDOW_DAYS)).date_naive()
    }

    async fn query(&self, http: &dyn HttpClient, query: String, op: &str) -> Result<Vec<GraphqlPost>> {
        let body = serde_json::to_vec(&serde_json::json!({ "query": query }))
            .map_err(|source| BotError::Decode {
                what: format!("request for {op}"),
                source,
            })?;

        let response: GraphqlResponse = http
            .post(&self.endpoint, "application/json", body)
            .await
            .and_then(|response| response.error_for_status(&self.endpoint))
            .context(format!("get {op}"))?
            .json(op)?;

        Ok(response.into_results())
    }

    /// Fetch the post at `offset` in newest-first order.
    pub async fn random_post(&self, http: &dyn HttpClient, offset: usize) -> Result<PostDetail> {
        let op = format!("{} random post", self.name);
        let results = self.query(http, Self::random_query(offset), &op).await?;

        results
            .into_iter()
            .next()
            .map(GraphqlPost::into_detail)
            .ok_or(BotError::NotFound(op))
    }

    /// Format the week's top posts with their authors.
    pub async fn top_posts(&self, http: &dyn HttpClient, after: NaiveDate) -> Result<String> {
        let op = format!("{} top posts", self.name);
        let results = self.query(http, Self::top_query(after), &op).await?;

        let mut text = format!("🏆 Top posts this week from {}:\n\n", self.base_url);
        for (i, post) in results.iter().enumerate() {
            let _ = write!(
                text,
                "{}. [{}]({}) ({})\n\n",
                i + 1,
                post.title,
                post.page_url,
                post.user.display_name
            );
        }

        Ok(text)
    }
}
