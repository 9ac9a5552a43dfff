//! Cache store trait definition

use super::entry::CachedEntry;
use async_trait::async_trait;

/// Keyed storage for cached responses
///
/// Implemented by concrete providers (in-memory, no-op) and by embedders that own a
/// persistent store. Stores are shared across tasks and must synchronize internally.
/// Operations are infallible from the caller's view: a backend that fails should log
/// and behave as a miss.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Get the entry stored under `key`
    async fn get(&self, key: &str) -> Option<CachedEntry>;

    /// Store or overwrite the entry under `key`
    async fn put(&self, key: &str, entry: CachedEntry);

    /// Remove the entry under `key`, if any
    async fn remove(&self, key: &str);

    /// Whether entries written here outlive the process
    fn is_persistent(&self) -> bool {
        false
    }

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}
