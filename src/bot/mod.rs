//! Request handling: resolve the user's source, load or build its listing,
//! pick a post and render it.

mod listing;
mod random;
mod source;
mod top;

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::app::Result;
use crate::domain::Source;
use crate::fetcher::HttpClient;
use crate::markdown::{MarkdownRenderer, POST_MAX_LENGTH};
use crate::scraper::ScraperConfig;
use crate::sources::{graphql, GraphqlSource, ScrapeSource, SubstackSource};
use crate::store::Store;

pub const MESSAGE_HELP: &str = "🤖 I'm a bot for reading posts:

Commands:

/top - Top posts

/random - Read random post

/source - Change source:

  1. [Lesswrong.ru](https://lesswrong.ru) (default)
  2. [Slate Star Codex](https://slatestarcodex.com)
  3. [Astral Codex Ten](https://astralcodexten.substack.com)
  4. [Lesswrong.com](https://lesswrong.com)

/help - Help";

pub const MESSAGE_TOP_NOT_FOUND: &str = "Top posts not found";
pub const MESSAGE_RANDOM_NOT_FOUND: &str = "Random post not found";
pub const MESSAGE_CHANGE_SOURCE_FAILED: &str = "Change source failed";

/// Draws an index in `0..n` for `n > 0`.
pub type RandomInt = Arc<dyn Fn(usize) -> usize + Send + Sync>;

pub fn thread_random() -> RandomInt {
    Arc::new(|n| rand::rng().random_range(0..n))
}

/// Tunables of the request pipeline.
#[derive(Debug, Clone)]
pub struct BotOptions {
    /// Lifetime of cached listings; zero keeps them forever
    pub cache_expire: Duration,
    pub max_post_length: usize,
    pub scraper: ScraperConfig,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            cache_expire: Duration::from_secs(24 * 60 * 60),
            max_post_length: POST_MAX_LENGTH,
            scraper: ScraperConfig::default(),
        }
    }
}

pub struct Bot {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn Store>,
    random_int: RandomInt,
    cache_expire: Duration,
    renderer: MarkdownRenderer,
    lesswrong_ru: ScrapeSource,
    slate: ScrapeSource,
    astral: SubstackSource,
    lesswrong: GraphqlSource,
}

impl Bot {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn Store>,
        options: BotOptions,
    ) -> Result<Self> {
        Ok(Self {
            http,
            store,
            random_int: thread_random(),
            cache_expire: options.cache_expire,
            renderer: MarkdownRenderer::new(options.max_post_length),
            lesswrong_ru: ScrapeSource::new(
                Source::LesswrongRu.domain(),
                &options.scraper.lesswrong_ru,
            )?,
            slate: ScrapeSource::new("slatestarcodex", &options.scraper.slate)?,
            astral: SubstackSource::new("astralcodexten", Source::AstralCodexTen.base_url()),
            lesswrong: GraphqlSource::new(
                Source::Lesswrong.domain(),
                Source::Lesswrong.base_url(),
                graphql::GRAPHQL_URL,
            ),
        })
    }

    /// Replace the randomness source, e.g. with a fixed index in tests.
    pub fn with_random_int(mut self, random_int: RandomInt) -> Self {
        self.random_int = random_int;
        self
    }

    fn random_int(&self, n: usize) -> usize {
        (self.random_int)(n)
    }

    pub fn source_key(user_id: i64) -> String {
        format!("source:{user_id}")
    }

    /// The user's stored source, or the default one. Storage failures are
    /// logged and treated as "no preference".
    pub fn current_source(&self, user_id: i64) -> Source {
        let key = Self::source_key(user_id);
        match self.store.get(&key) {
            Ok(stored) => Source::from_preference(stored.as_deref()),
            Err(e) => {
                tracing::error!(%key, error = %e, "Get source failed");
                Source::default()
            }
        }
    }
}
