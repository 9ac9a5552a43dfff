//! Response cache facade combining a store, the policy evaluator and a clock.
//!
//! The evaluator stays pure; this type performs the store side effects the evaluator
//! asks for (eviction, persistence, 304 header merges).

use super::entry::{CachedEntry, StoragePolicy};
use super::policy::{CacheDecision, CachePolicy};
use super::providers::NoOpCacheStore;
use super::store::CacheStore;
use crate::clock::{Clock, SystemClock};
use crate::http::{HeaderAliases, HttpRequest, ResponseMetadata};
use bytes::Bytes;
use http::HeaderMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    policy: Arc<CachePolicy>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("provider", &self.store.provider_name())
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .finish()
    }
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        info!(
            provider = store.provider_name(),
            persistent = store.is_persistent(),
            "💾 Response cache initialized"
        );
        Self {
            store,
            policy: Arc::new(policy),
            clock,
        }
    }

    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            store: Arc::new(NoOpCacheStore::new()),
            policy: Arc::new(CachePolicy::default()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn aliases(&self) -> &HeaderAliases {
        self.policy.aliases()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn is_enabled(&self) -> bool {
        self.store.provider_name() != "noop"
    }

    /// Evaluate the stored entry for `request`, evicting it when the policy says so
    pub async fn lookup(&self, request: &HttpRequest) -> CacheDecision {
        let key = request.cache_key();
        let entry = self.store.get(&key).await;
        let decision = self.evaluate_entry(entry.as_ref(), request);

        if let CacheDecision::Miss(reason) = &decision {
            if entry.is_some() && reason.evicts() {
                debug!(key = %key, reason = ?reason, "Evicting cached entry");
                self.store.remove(&key).await;
            }
        }

        debug!(key = %key, decision = %decision, "Cache lookup");
        decision
    }

    /// Evaluate `entry` against `request` using the entry's own headers
    pub fn evaluate_entry(&self, entry: Option<&CachedEntry>, request: &HttpRequest) -> CacheDecision {
        let empty = HeaderMap::new();
        let headers = entry.map(|e| &e.headers).unwrap_or(&empty);
        self.policy.evaluate(entry, request, headers, self.clock.now())
    }

    /// Persist a fresh network response when its headers allow it
    ///
    /// A response that may not be stored also drops whatever was stored for the key.
    pub async fn store_response(
        &self,
        request: &HttpRequest,
        response: &ResponseMetadata,
        body: &Bytes,
    ) -> Option<CachedEntry> {
        let key = request.cache_key();
        let storage_policy = self.policy.storage_policy_for(request, response);

        if storage_policy == StoragePolicy::NotAllowed {
            debug!(key = %key, status = %response.status, "Response not cacheable");
            self.store.remove(&key).await;
            return None;
        }

        let entry = CachedEntry::from_response(
            request,
            response,
            body.clone(),
            storage_policy,
            self.clock.now(),
            self.aliases(),
        );
        self.store.put(&key, entry.clone()).await;
        Some(entry)
    }

    /// Apply a `304 Not Modified` to the stored entry and return the refreshed entry
    pub async fn revalidated(
        &self,
        request: &HttpRequest,
        not_modified: &ResponseMetadata,
    ) -> Option<CachedEntry> {
        let key = request.cache_key();
        let mut entry = self.store.get(&key).await?;
        entry.merge_not_modified(&not_modified.headers, self.clock.now());
        self.store.put(&key, entry.clone()).await;
        self.policy.did_use_entry(&key, &entry);
        Some(entry)
    }

    /// Record that a stored entry was served without revalidation
    pub fn mark_used(&self, request: &HttpRequest, entry: &CachedEntry) {
        self.policy.did_use_entry(&request.cache_key(), entry);
    }

    pub async fn invalidate(&self, request: &HttpRequest) {
        self.store.remove(&request.cache_key()).await;
    }
}
