use url::Url;

use crate::app::{BotError, Result, ResultExt};
use crate::domain::{PostDetail, PostReference};
use crate::fetcher::HttpClient;
use crate::scraper::{ContentExtractor, SiteSelectors};

/// Source whose posts are only available as web pages.
pub struct ScrapeSource {
    name: &'static str,
    listing_url: Url,
    extractor: ContentExtractor,
}

impl ScrapeSource {
    pub fn new(name: &'static str, selectors: &SiteSelectors) -> Result<Self> {
        let listing_url = Url::parse(&selectors.listing_url).map_err(|e| {
            BotError::Config(format!(
                "invalid listing url for {name}: {}: {e}",
                selectors.listing_url
            ))
        })?;

        Ok(Self {
            name,
            listing_url,
            extractor: ContentExtractor::new(selectors)?,
        })
    }

    /// Scrape the single archive page. An archive with no entries is an error.
    pub async fn fetch_listing(&self, http: &dyn HttpClient) -> Result<Vec<PostReference>> {
        let url = self.listing_url.as_str();
        let page = http
            .get(url)
            .await
            .and_then(|response| response.error_for_status(url))
            .context(format!("get {} posts", self.name))?;

        let posts = self.extractor.extract_listing(&page.text(), &self.listing_url);
        if posts.is_empty() {
            return Err(BotError::NotFound(format!("{} posts", self.name)));
        }

        tracing::info!(source = self.name, count = posts.len(), "Scraped post listing");
        Ok(posts)
    }

    /// Load the post page and cut out its body.
    pub async fn fetch_detail(
        &self,
        http: &dyn HttpClient,
        post: &PostReference,
    ) -> Result<PostDetail> {
        let page = http
            .get(&post.url)
            .await
            .and_then(|response| response.error_for_status(&post.url))
            .context(format!("get {} random post", self.name))?;

        let html = match self.extractor.extract_content(&page.text()) {
            Some(html) => html,
            None => {
                tracing::warn!(source = self.name, url = %post.url, "Post body not found on page");
                String::new()
            }
        };

        Ok(PostDetail::new(post.clone(), html))
    }
}
