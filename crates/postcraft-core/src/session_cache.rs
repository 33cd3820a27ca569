//! Port for the single-slot session cache.

use async_trait::async_trait;

use crate::content::ContentRecord;
use crate::error::Result;

/// Key of the slot holding the last generated record.
pub const SESSION_CACHE_KEY: &str = "generatedContent";

/// Holds the last generated `ContentRecord` between runs.
///
/// Written after every successful generation, read once at startup and
/// cleared on reset.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn load(&self) -> Result<Option<ContentRecord>>;

    async fn store(&self, record: &ContentRecord) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
