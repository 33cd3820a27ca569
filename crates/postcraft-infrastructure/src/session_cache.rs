//! Session cache implementations.
//!
//! `FileSessionCache` keeps the last generated record in one JSON file so a
//! restarted shell picks up where it left off. `InMemorySessionCache` lives
//! only as long as the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postcraft_core::content::ContentRecord;
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::session_cache::{SESSION_CACHE_KEY, SessionCache};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::storage::AtomicJsonFile;

/// On-disk layout of the cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionSnapshot {
    key: String,
    saved_at: DateTime<Utc>,
    record: ContentRecord,
}

/// Single-slot cache backed by a JSON file.
#[derive(Clone)]
pub struct FileSessionCache {
    file: Arc<Mutex<AtomicJsonFile<SessionSnapshot>>>,
}

impl FileSessionCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(Mutex::new(AtomicJsonFile::new(path))),
        }
    }

    async fn blocking<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicJsonFile<SessionSnapshot>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            let file = file.blocking_lock();
            op(&file)
        })
        .await
        .map_err(|e| PostcraftError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    async fn load(&self) -> Result<Option<ContentRecord>> {
        let loaded = self.blocking(|file| file.load()).await;
        match loaded {
            Ok(Some(snapshot)) if snapshot.key == SESSION_CACHE_KEY => {
                tracing::debug!(saved_at = %snapshot.saved_at, "Restored cached content");
                Ok(Some(snapshot.record))
            }
            Ok(Some(snapshot)) => {
                tracing::warn!(key = %snapshot.key, "Ignoring session cache with unknown key");
                Ok(None)
            }
            Ok(None) => Ok(None),
            Err(PostcraftError::Serialization { message, .. }) => {
                tracing::warn!("Ignoring unreadable session cache: {}", message);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn store(&self, record: &ContentRecord) -> Result<()> {
        let snapshot = SessionSnapshot {
            key: SESSION_CACHE_KEY.to_string(),
            saved_at: Utc::now(),
            record: record.clone(),
        };
        self.blocking(move |file| file.save(&snapshot)).await
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|file| file.remove()).await
    }
}

/// Process-lifetime cache.
#[derive(Clone, Default)]
pub struct InMemorySessionCache {
    slot: Arc<RwLock<Option<ContentRecord>>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn load(&self) -> Result<Option<ContentRecord>> {
        Ok(self.slot.read().await.clone())
    }

    async fn store(&self, record: &ContentRecord) -> Result<()> {
        *self.slot.write().await = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_cache_round_trip_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache/session.json");
        let cache = FileSessionCache::new(path.clone());

        assert!(cache.load().await.unwrap().is_none());

        let record = ContentRecord::new("# Hello", false).with_image("https://img.example/x.png");
        cache.store(&record).await.unwrap();
        assert!(path.exists());

        let reopened = FileSessionCache::new(path.clone());
        assert_eq!(reopened.load().await.unwrap(), Some(record));

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert!(reopened.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites_single_slot() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileSessionCache::new(temp_dir.path().join("session.json"));

        cache.store(&ContentRecord::new("first", false)).await.unwrap();
        cache.store(&ContentRecord::new("second", true)).await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded.result_text, "second");
        assert!(loaded.is_news);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{\"key\": 3").unwrap();

        let cache = FileSessionCache::new(path);
        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_cache() {
        let cache = InMemorySessionCache::new();
        cache.store(&ContentRecord::new("x", false)).await.unwrap();
        assert!(cache.load().await.unwrap().is_some());
        cache.clear().await.unwrap();
        assert!(cache.load().await.unwrap().is_none());
    }
}
