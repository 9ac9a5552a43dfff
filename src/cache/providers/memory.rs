//! In-process cache store backed by `DashMap`
//!
//! Not persistent: entries live as long as the store. Accepts both `Allowed` and
//! `AllowedInMemoryOnly` entries.

use crate::cache::entry::CachedEntry;
use crate::cache::store::CacheStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<DashMap<String, CachedEntry>>,
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<CachedEntry> {
        let result = self.entries.get(key).map(|entry| entry.value().clone());

        if result.is_some() {
            debug!(key = key, "Cache HIT (memory)");
        } else {
            debug!(key = key, "Cache MISS (memory)");
        }

        result
    }

    async fn put(&self, key: &str, entry: CachedEntry) {
        if !entry.storage_policy.is_storable() {
            debug!(key = key, "Cache PUT skipped, storage not allowed");
            return;
        }
        self.entries.insert(key.to_string(), entry);
        debug!(key = key, "Cache PUT (memory)");
    }

    async fn remove(&self, key: &str) {
        self.entries.remove(key);
        debug!(key = key, "Cache DEL (memory)");
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::{EntryMetadata, StoragePolicy};
    use bytes::Bytes;
    use chrono::Utc;
    use http::{HeaderMap, Method, StatusCode};

    fn entry(policy: StoragePolicy) -> CachedEntry {
        CachedEntry {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"body"),
            metadata: EntryMetadata {
                method: Method::GET,
                accept_language: None,
                stored_at: Utc::now(),
            },
            storage_policy: policy,
        }
    }

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryCacheStore::new();
        assert!(store.get("a").await.is_none());

        store.put("a", entry(StoragePolicy::Allowed)).await;
        assert_eq!(store.get("a").await.unwrap().body, Bytes::from_static(b"body"));
        assert_eq!(store.len(), 1);

        store.remove("a").await;
        assert!(store.get("a").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_not_allowed_entries_are_dropped() {
        let store = MemoryCacheStore::new();
        store.put("a", entry(StoragePolicy::NotAllowed)).await;
        assert!(!store.contains("a"));

        store.put("b", entry(StoragePolicy::AllowedInMemoryOnly)).await;
        assert!(store.contains("b"));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryCacheStore::new();
        let other = store.clone();
        store.put("a", entry(StoragePolicy::Allowed)).await;
        assert!(other.contains("a"));
    }
}
