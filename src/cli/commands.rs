//! Command handlers. Each returns the reply text; failures are logged and
//! replaced by a fixed fallback message.

use std::future::Future;
use std::time::Duration;

use crate::app::{AppContext, Result};
use crate::bot::{
    MESSAGE_CHANGE_SOURCE_FAILED, MESSAGE_HELP, MESSAGE_RANDOM_NOT_FOUND, MESSAGE_TOP_NOT_FOUND,
};

pub async fn random(ctx: &AppContext, user_id: i64) -> String {
    let reply = within(ctx.request_timeout, ctx.bot.random_post(user_id)).await;
    or_fallback(reply, "random", MESSAGE_RANDOM_NOT_FOUND)
}

pub async fn top(ctx: &AppContext, user_id: i64) -> String {
    let reply = within(ctx.request_timeout, ctx.bot.top_posts(user_id)).await;
    or_fallback(reply, "top", MESSAGE_TOP_NOT_FOUND)
}

pub fn source(ctx: &AppContext, user_id: i64, code: Option<&str>) -> String {
    let reply = ctx.bot.change_source(user_id, code.unwrap_or_default());
    or_fallback(Some(reply), "source", MESSAGE_CHANGE_SOURCE_FAILED)
}

pub fn help() -> String {
    MESSAGE_HELP.to_string()
}

async fn within<F>(limit: Duration, fut: F) -> Option<Result<String>>
where
    F: Future<Output = Result<String>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(reply) => Some(reply),
        Err(_) => {
            tracing::error!(timeout = ?limit, "Command timed out");
            None
        }
    }
}

fn or_fallback(reply: Option<Result<String>>, command: &str, fallback: &str) -> String {
    match reply {
        Some(Ok(text)) => text,
        Some(Err(e)) => {
            tracing::error!(command, error = %e, "Command failed");
            fallback.to_string()
        }
        None => fallback.to_string(),
    }
}
