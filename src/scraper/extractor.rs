use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{BotError, Result};
use crate::domain::PostReference;
use crate::scraper::SiteSelectors;

/// Compiled selectors for one site.
pub struct ContentExtractor {
    entry: Selector,
    link: Option<Selector>,
    content: Selector,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| BotError::Selector(format!("{selector}: {e:?}")))
}

impl ContentExtractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            entry: parse_selector(&selectors.entry_selector)?,
            link: selectors
                .link_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            content: parse_selector(&selectors.content_selector)?,
        })
    }

    /// Collect every listing entry on an archive page, in document order.
    ///
    /// Relative links are resolved against `page_url`; entries without a
    /// usable link are skipped.
    pub fn extract_listing(&self, html: &str, page_url: &Url) -> Vec<PostReference> {
        let document = Html::parse_document(html);

        document
            .select(&self.entry)
            .filter_map(|entry| {
                let href = self.entry_href(entry)?;
                let url = page_url.join(href.trim()).ok()?;
                let title = collapse_whitespace(&entry.text().collect::<String>());
                Some(PostReference::new(title, url.to_string()))
            })
            .collect()
    }

    /// Inner markup of the first element matching the content selector.
    pub fn extract_content(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.content)
            .next()
            .map(|element| element.inner_html())
    }

    fn entry_href<'a>(&self, entry: ElementRef<'a>) -> Option<&'a str> {
        let anchor = match &self.link {
            Some(link) => entry.select(link).next()?,
            None => entry,
        };
        anchor.value().attr("href").filter(|href| !href.trim().is_empty())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
