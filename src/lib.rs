//! # lesswrong-bot
//!
//! A bot for reading posts from lesswrong.ru, Slate Star Codex,
//! Astral Codex Ten and lesswrong.com as Markdown.
//!
//! ## Architecture
//!
//! ```text
//! Source → Listing (cached in Store) → random pick → Detail → Markdown
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Read a random post from the current source
//! lesswrong-bot random
//!
//! # Switch to Astral Codex Ten and show its top posts
//! lesswrong-bot source 3
//! lesswrong-bot top
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`bot`]: Command semantics (random, top, source)
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Sources and post models
//! - [`fetcher`]: HTTP client abstraction
//! - [`markdown`]: HTML to Markdown rendering
//! - [`scraper`]: CSS selector extraction for scraped sites
//! - [`sources`]: Per-source fetch strategies
//! - [`store`]: Key-value cache

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store,
/// HTTP client and bot.
pub mod app;

/// The request pipeline behind every command.
///
/// - [`Bot::random_post`](bot::Bot::random_post): render one random post
/// - [`Bot::top_posts`](bot::Bot::top_posts): ranked or sampled list of posts
/// - [`Bot::change_source`](bot::Bot::change_source): show or store the preference
pub mod bot;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/lesswrong-bot/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Source`](domain::Source): the four supported sources
/// - [`PostReference`](domain::PostReference): listing entry
/// - [`PostDetail`](domain::PostDetail): post with its HTML body
pub mod domain;

/// HTTP fetching.
///
/// - [`HttpClient`](fetcher::HttpClient): async trait for GET/POST
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// HTML to Markdown conversion, truncation and syntax repair.
pub mod markdown;

/// Listing and body extraction from HTML pages.
pub mod scraper;

/// Fetch strategies: scraping, paginated JSON, GraphQL and a fixed list.
pub mod sources;

/// Key-value cache.
///
/// - [`Store`](store::Store): trait with TTL semantics
/// - [`MemoryStore`](store::MemoryStore): in-process map
/// - [`SqliteStore`](store::SqliteStore): persistent SQLite implementation
pub mod store;
