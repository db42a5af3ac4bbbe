use crate::app::{BotError, Result};
use crate::bot::Bot;
use crate::domain::{PostDetail, Source};
use crate::sources::graphql::POSTS_MAX_COUNT;
use crate::sources::{ScrapeSource, SubstackSource};

impl Bot {
    /// Render a random post from the user's source.
    pub async fn random_post(&self, user_id: i64) -> Result<String> {
        let source = self.current_source(user_id);
        tracing::debug!(user_id, source = source.code(), "Random post");

        let post = self.random_detail(source).await?;
        self.renderer.render_post(&post, source)
    }

    async fn random_detail(&self, source: Source) -> Result<PostDetail> {
        let http = self.http.as_ref();

        let strategy = match source {
            Source::Lesswrong => {
                let offset = self.random_int(POSTS_MAX_COUNT);
                return self.lesswrong.random_post(http, offset).await;
            }
            Source::LesswrongRu => Detail::Scrape(&self.lesswrong_ru),
            Source::SlateStarCodex => Detail::Scrape(&self.slate),
            Source::AstralCodexTen => Detail::Substack(&self.astral),
        };

        let posts = self.listing(source).await?;
        if posts.is_empty() {
            return Err(BotError::NotFound(format!("{} posts", source.domain())));
        }

        let post = self.pick(&posts)?;
        tracing::debug!(url = %post.url, "Picked post");

        match strategy {
            Detail::Scrape(scrape) => scrape.fetch_detail(http, post).await,
            Detail::Substack(substack) => substack.fetch_detail(http, post).await,
        }
    }
}

enum Detail<'a> {
    Scrape(&'a ScrapeSource),
    Substack(&'a SubstackSource),
}
