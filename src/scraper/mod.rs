//! HTML extraction for sources that only publish web pages.
//!
//! # Architecture
//!
//! ```text
//! Archive page → ContentExtractor::extract_listing → Vec<PostReference>
//! Post page    → ContentExtractor::extract_content → body HTML
//! ```
//!
//! Selectors are per site and come from [`ScraperConfig`].

mod config;
mod extractor;

pub use config::{ScraperConfig, SiteSelectors};
pub use extractor::ContentExtractor;
