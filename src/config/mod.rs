//! Configuration management for the bot.
//!
//! Configuration is read from `~/.config/lesswrong-bot/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::markdown::POST_MAX_LENGTH;
use crate::scraper::ScraperConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lifetime of cached post listings, e.g. `"24h"`
    pub cache_expire: String,
    /// Upper bound for one command including every request it makes
    pub request_timeout: String,
    /// Posts longer than this many characters are cut at the next line break
    pub max_post_length: usize,
    /// SQLite cache location; defaults to the user data directory
    pub database: Option<PathBuf>,
    pub scraper: ScraperConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_expire: "24h".to_string(),
            request_timeout: "15s".to_string(),
            max_post_length: POST_MAX_LENGTH,
            database: None,
            scraper: ScraperConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            tracing::info!(path = %config_path.display(), "Created default config");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/lesswrong-bot/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("lesswrong-bot").join("config.toml"))
    }

    pub fn cache_expire(&self) -> Result<Duration, ConfigError> {
        parse_duration("cache_expire", &self.cache_expire)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = parse_duration("request_timeout", &self.request_timeout)?;
        if timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "request_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(timeout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.cache_expire()?;
        self.request_timeout()?;
        if self.max_post_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_post_length",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# lesswrong-bot configuration
#
# Durations are written as "30s", "15m", "24h", "7d" or plain seconds.

# How long scraped post listings stay cached ("0" keeps them forever)
cache_expire = "24h"

# Time limit for one command, including every request it makes
request_timeout = "15s"

# Posts longer than this many characters are cut at the next line break
max_post_length = 1500

# SQLite cache file (defaults to the user data directory)
# database = "/var/lib/lesswrong-bot/cache.db"

# CSS selectors of the scraped sites. Change them when the markup changes.
[scraper.lesswrong_ru]
listing_url = "https://lesswrong.ru/w"
entry_selector = "li.leaf.menu-depth-3, li.leaf.menu-depth-4"
link_selector = "a[href]"
content_selector = "div.tex2jax"

[scraper.slate]
listing_url = "https://slatestarcodex.com/archives/"
# Entries are the anchors themselves, so there is no link_selector
entry_selector = "a[href][rel=bookmark]"
content_selector = "div .entry-content"
"##
        .to_string()
    }
}

/// Parse a duration like `"1h"`, `"30m"`, `"1d"`, `"60s"` or `"3600"`.
pub fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim().to_lowercase();
    let invalid = |message: String| ConfigError::Invalid { field, message };

    let (digits, unit) = if let Some(hours) = s.strip_suffix('h') {
        (hours, 3600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        (minutes, 60)
    } else if let Some(days) = s.strip_suffix('d') {
        (days, 86400)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else {
        (s.as_str(), 1)
    };

    let value = digits.trim().parse::<u64>().map_err(|_| {
        invalid(format!(
            "invalid duration {s:?}, use a format like '15s', '30m', '24h', '1d'"
        ))
    })?;

    value
        .checked_mul(unit)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid(format!("duration {s:?} is too large")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::SiteSelectors;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.cache_expire().unwrap(), Duration::from_secs(24 * 3600));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(15));
        assert_eq!(config.max_post_length, POST_MAX_LENGTH);
        assert_eq!(config.database, None);
        assert_eq!(config.scraper, ScraperConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
cache_expire = "1h"

[scraper.slate]
listing_url = "https://example.com/archives/"
entry_selector = "a.post"
content_selector = "article"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom values
        assert_eq!(config.cache_expire().unwrap(), Duration::from_secs(3600));
        assert_eq!(config.scraper.slate.entry_selector, "a.post");
        assert_eq!(config.scraper.slate.link_selector, None);
        // Default values
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(15));
        assert_eq!(config.scraper.lesswrong_ru, SiteSelectors::lesswrong_ru());
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.cache_expire, "24h");
        assert_eq!(config.max_post_length, 1500);
    }

    #[test]
    fn test_parse_duration() {
        let parse = |s| parse_duration("test", s).unwrap().as_secs();
        assert_eq!(parse("1h"), 3600);
        assert_eq!(parse("30m"), 1800);
        assert_eq!(parse("1d"), 86400);
        assert_eq!(parse("60s"), 60);
        assert_eq!(parse("3600"), 3600);
        assert_eq!(parse(" 24H "), 86400);
        assert_eq!(parse("0"), 0);
        assert!(parse_duration("test", "invalid").is_err());
        assert!(parse_duration("test", "").is_err());
        assert!(parse_duration("test", "-5m").is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(config.cache_expire, "24h");
        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.scraper, config.scraper);
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "request_timeout = \"0s\"\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "request_timeout", .. }));

        fs::write(&path, "cache_expire = \"soon\"\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());

        fs::write(&path, "max_post_length = \"long\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
