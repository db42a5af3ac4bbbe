use std::time::Duration;

use crate::app::{Result, ResultExt};
use crate::bot::Bot;
use crate::domain::Source;

impl Bot {
    /// Show or change the user's source.
    ///
    /// An empty argument reports the current source. An unknown code leaves
    /// the preference untouched.
    pub fn change_source(&self, user_id: i64, arg: &str) -> Result<String> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Ok(format!("Current source is {}", self.current_source(user_id)));
        }

        let Some(source) = Source::from_code(arg) else {
            tracing::debug!(user_id, %arg, "Rejected source code");
            return Ok(format!(
                "New source is invalid. Current source is {}",
                self.current_source(user_id)
            ));
        };

        let key = Self::source_key(user_id);
        self.store
            .set(&key, source.code(), Duration::ZERO)
            .context("set source")?;

        tracing::info!(user_id, source = source.code(), "Changed source");
        Ok(format!("Changed source to {source}"))
    }
}
