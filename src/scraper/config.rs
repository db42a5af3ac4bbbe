use serde::{Deserialize, Serialize};

/// CSS selector contract for one scraped site.
///
/// These selectors track third-party markup, so they live in the config file
/// rather than in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Archive page listing every post
    pub listing_url: String,

    /// Selector matching one listing entry
    pub entry_selector: String,

    /// Selector of the anchor inside an entry. When absent the entry itself
    /// is the anchor.
    #[serde(default)]
    pub link_selector: Option<String>,

    /// Container of the post body on a post page
    pub content_selector: String,
}

/// Selectors for every scraped source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub lesswrong_ru: SiteSelectors,
    pub slate: SiteSelectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            lesswrong_ru: SiteSelectors::lesswrong_ru(),
            slate: SiteSelectors::slate(),
        }
    }
}

impl SiteSelectors {
    pub fn lesswrong_ru() -> Self {
        Self {
            listing_url: "https://lesswrong.ru/w".to_string(),
            entry_selector: "li.leaf.menu-depth-3, li.leaf.menu-depth-4".to_string(),
            link_selector: Some("a[href]".to_string()),
            content_selector: "div.tex2jax".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            listing_url: "https://slatestarcodex.com/archives/".to_string(),
            entry_selector: "a[href][rel=bookmark]".to_string(),
            link_selector: None,
            content_selector: "div .entry-content".to_string(),
        }
    }
}
