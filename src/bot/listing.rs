use crate::app::{BotError, Result};
use crate::bot::Bot;
use crate::domain::{PostReference, Source};

impl Bot {
    /// Cached listing of `source`, fetched and cached on a miss.
    ///
    /// A cached non-empty listing is reused until it expires. Unreadable or
    /// corrupt cache entries count as misses, and a failed cache write is
    /// logged without failing the request.
    pub(crate) async fn listing(&self, source: Source) -> Result<Vec<PostReference>> {
        let no_listing = || BotError::Other(format!("{} has no post listing", source.domain()));
        let key = source.cache_key().ok_or_else(no_listing)?;

        if let Some(posts) = self.cached_listing(key) {
            tracing::debug!(%key, count = posts.len(), "Listing cache hit");
            return Ok(posts);
        }

        tracing::debug!(%key, "Listing cache miss");
        let http = self.http.as_ref();
        let posts = match source {
            Source::LesswrongRu => self.lesswrong_ru.fetch_listing(http).await?,
            Source::SlateStarCodex => self.slate.fetch_listing(http).await?,
            Source::AstralCodexTen => self.astral.fetch_listing(http).await?,
            Source::Lesswrong => return Err(no_listing()),
        };

        if !posts.is_empty() {
            self.cache_listing(key, &posts);
        }

        Ok(posts)
    }

    fn cached_listing(&self, key: &str) -> Option<Vec<PostReference>> {
        let cached = match self.store.get(key) {
            Ok(Some(cached)) if !cached.is_empty() => cached,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Get cached posts failed");
                return None;
            }
        };

        match serde_json::from_str::<Vec<PostReference>>(&cached) {
            Ok(posts) if !posts.is_empty() => Some(posts),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Cached posts are corrupt, refetching");
                None
            }
        }
    }

    fn cache_listing(&self, key: &str, posts: &[PostReference]) {
        let encoded = match serde_json::to_string(posts) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(%key, error = %e, "Marshal posts failed");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &encoded, self.cache_expire) {
            tracing::error!(%key, error = %e, "Cache posts failed");
        }
    }

    /// Pick an entry with the injected randomness.
    pub(crate) fn pick<'a>(&self, posts: &'a [PostReference]) -> Result<&'a PostReference> {
        let i = self.random_int(posts.len());
        posts
            .get(i)
            .ok_or_else(|| BotError::Other(format!("random index {i} out of {} posts", posts.len())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::app::{BotError, Result};
    use crate::bot::test_support::*;
    use crate::domain::{PostReference, Source};
    use crate::fetcher::mock::MockHttpClient;
    use crate::store::Store;

    const SLATE_ARCHIVES: &str = "https://slatestarcodex.com/archives/";
    const ARCHIVE_PAGE: &str = r#"<a rel="bookmark" href="/a/">A</a><a rel="bookmark" href="/b/">B</a>"#;

    struct BrokenStore;

    impl Store for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(BotError::Store("read failed".into()))
        }

        fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
            Err(BotError::Store("write failed".into()))
        }
    }

    #[tokio::test]
    async fn test_listing_is_fetched_once_then_cached() {
        let http = Arc::new(MockHttpClient::new().on_get(SLATE_ARCHIVES, ARCHIVE_PAGE));
        let store = memory();
        let bot = bot(http.clone(), store.clone(), 0);

        let first = bot.listing(Source::SlateStarCodex).await.unwrap();
        let second = bot.listing(Source::SlateStarCodex).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(http.request_count(), 1);
        assert!(store.get("posts:slatestarcodex").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cached_listing_skips_network() {
        let http = Arc::new(MockHttpClient::new());
        let store = memory();
        let cached = vec![PostReference::new("Cached", "https://slatestarcodex.com/cached/")];
        store
            .set(
                "posts:slatestarcodex",
                &serde_json::to_string(&cached).unwrap(),
                Duration::ZERO,
            )
            .unwrap();
        let bot = bot(http.clone(), store, 0);

        let posts = bot.listing(Source::SlateStarCodex).await.unwrap();

        assert_eq!(posts, cached);
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_or_empty_cache_is_refetched() {
        for cached in ["not json", "[]"] {
            let http = Arc::new(MockHttpClient::new().on_get(SLATE_ARCHIVES, ARCHIVE_PAGE));
            let store = memory();
            store
                .set("posts:slatestarcodex", cached, Duration::ZERO)
                .unwrap();
            let bot = bot(http.clone(), store, 0);

            let posts = bot.listing(Source::SlateStarCodex).await.unwrap();

            assert_eq!(posts.len(), 2, "{cached}");
            assert_eq!(http.request_count(), 1, "{cached}");
        }
    }

    #[tokio::test]
    async fn test_broken_store_still_serves_listing() {
        let http = Arc::new(MockHttpClient::new().on_get(SLATE_ARCHIVES, ARCHIVE_PAGE));
        let bot = bot(http.clone(), Arc::new(BrokenStore), 0);

        let posts = bot.listing(Source::SlateStarCodex).await.unwrap();

        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_graphql_source_has_no_listing() {
        let bot = bot(Arc::new(MockHttpClient::new()), memory(), 0);
        assert!(bot.listing(Source::Lesswrong).await.is_err());
    }

    #[test]
    fn test_pick_uses_injected_index() {
        let posts = vec![
            PostReference::new("0", "u0"),
            PostReference::new("1", "u1"),
            PostReference::new("2", "u2"),
        ];

        let bot2 = bot(Arc::new(MockHttpClient::new()), memory(), 2);
        assert_eq!(bot2.pick(&posts).unwrap().title, "2");

        let bot9 = bot(Arc::new(MockHttpClient::new()), memory(), 9);
        assert!(bot9.pick(&posts).is_err());
    }
}
