use std::fmt::Write;

use crate::app::{BotError, Result};
use crate::bot::Bot;
use crate::domain::{Source, DEFAULT_LIMIT};
use crate::sources::graphql::GraphqlSource;
use crate::sources::hardcoded::MESSAGE_TOP_SLATE;

impl Bot {
    /// Render the top posts of the user's source.
    pub async fn top_posts(&self, user_id: i64) -> Result<String> {
        let source = self.current_source(user_id);
        tracing::debug!(user_id, source = source.code(), "Top posts");

        let http = self.http.as_ref();
        match source {
            Source::SlateStarCodex => Ok(MESSAGE_TOP_SLATE.to_string()),
            Source::AstralCodexTen => self.astral.top_posts(http).await,
            Source::Lesswrong => {
                self.lesswrong
                    .top_posts(http, GraphqlSource::top_cutoff())
                    .await
            }
            Source::LesswrongRu => self.random_picks(source).await,
        }
    }

    /// lesswrong.ru has no ranking, so its "top" is a handful of random
    /// picks from the listing. Picks may repeat.
    async fn random_picks(&self, source: Source) -> Result<String> {
        let posts = self.listing(source).await?;
        if posts.is_empty() {
            return Err(BotError::NotFound(format!("{} posts", source.domain())));
        }

        let mut text = format!("🏆 Random posts from {source}\n\n");
        for n in 1..=DEFAULT_LIMIT {
            let post = self.pick(&posts)?;
            let _ = write!(text, "{n}. {}\n\n", post.link());
        }

        Ok(text)
    }
}
