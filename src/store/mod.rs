pub mod memory;
pub mod sqlite;

use std::time::Duration;

use crate::app::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// String key-value storage with optional expiry.
pub trait Store: Send + Sync {
    /// Missing and expired keys are `Ok(None)`, not errors.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// A `ttl` of zero keeps the value until it is overwritten.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}
