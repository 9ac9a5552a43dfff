//! No-op cache store
//!
//! Always misses, silently drops writes. Used when caching is disabled.

use crate::cache::entry::CachedEntry;
use crate::cache::store::CacheStore;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct NoOpCacheStore;

impl NoOpCacheStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NoOpCacheStore {
    async fn get(&self, _key: &str) -> Option<CachedEntry> {
        None
    }

    async fn put(&self, _key: &str, _entry: CachedEntry) {}

    async fn remove(&self, _key: &str) {}

    fn provider_name(&self) -> &'static str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::{EntryMetadata, StoragePolicy};
    use bytes::Bytes;
    use chrono::Utc;
    use http::{HeaderMap, Method, StatusCode};

    #[tokio::test]
    async fn test_noop_never_returns_entries() {
        let store = NoOpCacheStore::new();
        let entry = CachedEntry {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"x"),
            metadata: EntryMetadata {
                method: Method::GET,
                accept_language: None,
                stored_at: Utc::now(),
            },
            storage_policy: StoragePolicy::Allowed,
        };
        store.put("key", entry).await;
        assert!(store.get("key").await.is_none());
        assert_eq!(store.provider_name(), "noop");
    }
}
