use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{BotError, Result};
use crate::bot::{Bot, BotOptions};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::HttpClient;
use crate::store::{SqliteStore, Store};

/// Everything a command needs, built once from the configuration.
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub bot: Bot,
    pub request_timeout: Duration,
}

impl AppContext {
    /// Load the configuration and open the SQLite cache it points to.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;

        let db_path = match &config.database {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };

        let store = SqliteStore::new(&db_path)?;
        match store.purge_expired() {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "Purged expired cache entries"),
            Err(e) => tracing::warn!(error = %e, "Purge expired cache entries failed"),
        }
        tracing::debug!(path = %db_path.display(), "Opened cache");

        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        let request_timeout = config.request_timeout()?;
        let http: Arc<dyn HttpClient> = Arc::new(HttpFetcher::with_timeout(request_timeout)?);
        Self::with_http(config, store, http)
    }

    pub fn with_http(
        config: Config,
        store: Arc<dyn Store>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self> {
        let request_timeout = config.request_timeout()?;
        let options = BotOptions {
            cache_expire: config.cache_expire()?,
            max_post_length: config.max_post_length,
            scraper: config.scraper,
        };
        let bot = Bot::new(http, store.clone(), options)?;

        Ok(Self {
            request_timeout,
            store,
            bot,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BotError::Config("Could not find data directory".into()))?;
        let bot_dir = data_dir.join("lesswrong-bot");
        std::fs::create_dir_all(&bot_dir)?;
        Ok(bot_dir.join("cache.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockHttpClient;
    use crate::store::MemoryStore;

    #[test]
    fn test_context_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let db_path = dir.path().join("cache.db");
        std::fs::write(
            &config_path,
            format!(
                "request_timeout = \"3s\"\ndatabase = {:?}\n",
                db_path.to_string_lossy()
            ),
        )
        .unwrap();

        let ctx = AppContext::new(Some(&config_path)).unwrap();

        assert_eq!(ctx.request_timeout, Duration::from_secs(3));
        assert!(db_path.exists());
        ctx.store.set("source:1", "2", Duration::ZERO).unwrap();
        assert_eq!(ctx.bot.current_source(1).code(), "2");
    }

    #[test]
    fn test_invalid_duration_is_a_config_error() {
        let config = Config {
            cache_expire: "whenever".to_string(),
            ..Config::default()
        };

        let result = AppContext::with_http(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MockHttpClient::new()),
        );

        assert!(matches!(result, Err(BotError::Config(_))));
    }
}
