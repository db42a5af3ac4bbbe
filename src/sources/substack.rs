use std::fmt::Write;

use crate::app::{BotError, Result, ResultExt};
use crate::domain::{PostDetail, PostReference, SubstackPost, DEFAULT_LIMIT};
use crate::fetcher::HttpClient;

/// Number of entries requested for the top list.
pub const TOP_LIMIT: usize = 10;

/// A substack publication read through its JSON API.
pub struct SubstackSource {
    name: &'static str,
    base_url: String,
}

impl SubstackSource {
    pub fn new(name: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into(),
        }
    }

    pub fn archive_url(&self, sort: &str, limit: usize, offset: Option<usize>) -> String {
        let mut url = format!("{}/api/v1/archive?sort={sort}&limit={limit}", self.base_url);
        if let Some(offset) = offset {
            let _ = write!(url, "&offset={offset}");
        }
        url
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/api/v1/posts/{slug}", self.base_url)
    }

    /// Walk the archive page by page until an empty page comes back,
    /// dropping subscriber-only posts.
    ///
    /// A failing first page is an error. A failure further in stops the walk
    /// and keeps whatever was collected so far.
    pub async fn fetch_listing(&self, http: &dyn HttpClient) -> Result<Vec<PostReference>> {
        let mut posts = Vec::new();

        for page in 0.. {
            let url = self.archive_url("new", DEFAULT_LIMIT, Some(page * DEFAULT_LIMIT));

            let batch = match self.fetch_page(http, &url).await {
                Ok(batch) => batch,
                Err(e) if page == 0 => return Err(e.context(format!("get {} posts", self.name))),
                Err(e) => {
                    tracing::warn!(source = self.name, %url, error = %e, "Stopping pagination early");
                    break;
                }
            };

            if batch.is_empty() {
                break;
            }

            posts.extend(
                batch
                    .iter()
                    .filter(|post| !post.is_paid())
                    .map(SubstackPost::to_reference),
            );
        }

        tracing::info!(source = self.name, count = posts.len(), "Fetched post listing");
        Ok(posts)
    }

    async fn fetch_page(&self, http: &dyn HttpClient, url: &str) -> Result<Vec<SubstackPost>> {
        http.get(url)
            .await?
            .error_for_status(url)?
            .json(&format!("{} posts", self.name))
    }

    /// Load one post by the slug recorded in its listing entry.
    pub async fn fetch_detail(
        &self,
        http: &dyn HttpClient,
        post: &PostReference,
    ) -> Result<PostDetail> {
        let slug = post.slug.as_deref().ok_or_else(|| {
            BotError::Other(format!("{} post without slug: {}", self.name, post.url))
        })?;
        let url = self.post_url(slug);
        let op = format!("get {} random post", self.name);

        let detail: SubstackPost = http
            .get(&url)
            .await
            .and_then(|response| response.error_for_status(&url))
            .context(op.as_str())?
            .json(&format!("{} post", self.name))?;

        Ok(detail.into_detail())
    }

    /// Format the publication's own top ranking. Never cached.
    pub async fn top_posts(&self, http: &dyn HttpClient) -> Result<String> {
        let url = self.archive_url("top", TOP_LIMIT, None);

        let top: Vec<SubstackPost> = http
            .get(&url)
            .await
            .and_then(|response| response.error_for_status(&url))
            .context(format!("get {} top posts", self.name))?
            .json(&format!("{} top posts", self.name))?;

        let mut text = format!("🏆 Top posts from {}\n\n", self.base_url);

        // Numbers follow the archive ranking, so skipped paid posts leave gaps
        for (i, post) in top.iter().enumerate().filter(|(_, post)| !post.is_paid()) {
            let reference = post.to_reference();
            let _ = write!(text, "{}. {}\n\n", i + 1, reference.link());

            if !post.subtitle.is_empty() && post.subtitle != "..." {
                let _ = write!(text, "    {}\n\n", post.subtitle);
            }
        }

        Ok(text)
    }
}
