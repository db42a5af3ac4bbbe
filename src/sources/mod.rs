//! Fetch strategies, one per kind of remote source.
//!
//! - [`scrape`]: single archive page plus one page per post
//! - [`substack`]: paginated JSON archive plus per-slug post endpoint
//! - [`graphql`]: offset query for random posts, weekly top query
//! - [`hardcoded`]: fixed ranking that needs no network at all

pub mod graphql;
pub mod hardcoded;
pub mod scrape;
pub mod substack;

pub use graphql::GraphqlSource;
pub use scrape::ScrapeSource;
pub use substack::SubstackSource;
