//! Shared collaborators handed to every task.

use super::callback::CallbackQueue;
use super::fetch::Fetcher;
use crate::cache::{
    CachePolicy, CacheStore, DecisionHook, MemoryCacheStore, NoOpCacheStore, ResponseCache,
};
use crate::clock::{Clock, SystemClock};
use crate::config::NetaskConfig;
use crate::error::{NetworkError, NetworkResult};
use crate::http::HttpRequest;
use crate::scheduler::AutoRefreshScheduler;
use http::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::info;

/// Dependency container shared by tasks
///
/// Cheap to clone; clones share the cache, scheduler and callback queue.
#[derive(Clone)]
pub struct NetworkContext {
    /// Transport collaborator
    pub fetcher: Arc<dyn Fetcher>,

    /// Response cache (store + policy)
    pub cache: ResponseCache,

    /// Refresh timer registry
    pub scheduler: Arc<AutoRefreshScheduler>,

    pub config: Arc<NetaskConfig>,

    /// Where observer callbacks run
    pub callbacks: CallbackQueue,

    pub clock: Arc<dyn Clock>,

    /// Runtime that drives task attempts and refresh timers
    pub runtime: Handle,
}

impl std::fmt::Debug for NetworkContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkContext")
            .field("fetcher", &"Arc<dyn Fetcher>")
            .field("cache", &self.cache)
            .field("scheduler", &self.scheduler)
            .field("callbacks", &self.callbacks)
            .field("clock", &self.clock)
            .finish()
    }
}

impl NetworkContext {
    pub fn builder(fetcher: Arc<dyn Fetcher>) -> NetworkContextBuilder {
        NetworkContextBuilder::new(fetcher)
    }

    /// A request carrying the configured default timeout
    pub fn request(&self, method: Method, url: impl Into<String>) -> HttpRequest {
        HttpRequest::new(method, url).with_timeout(self.config.task.default_timeout())
    }

    pub fn get(&self, url: impl Into<String>) -> HttpRequest {
        self.request(Method::GET, url)
    }

    pub fn max_recovery_restarts(&self) -> u32 {
        self.config.task.max_recovery_restarts
    }

    /// How long `start_blocking` waits for a request with `timeout`
    pub fn synchronous_wait(&self, timeout: Duration) -> Duration {
        timeout.saturating_mul(self.config.task.synchronous_timeout_multiplier)
    }
}

pub struct NetworkContextBuilder {
    fetcher: Arc<dyn Fetcher>,
    config: NetaskConfig,
    store: Option<Arc<dyn CacheStore>>,
    hook: Option<Arc<dyn DecisionHook>>,
    clock: Arc<dyn Clock>,
    callbacks: Option<CallbackQueue>,
    runtime: Option<Handle>,
}

impl NetworkContextBuilder {
    fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            config: NetaskConfig::default(),
            store: None,
            hook: None,
            clock: Arc::new(SystemClock),
            callbacks: None,
            runtime: None,
        }
    }

    pub fn config(mut self, config: NetaskConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn hook(mut self, hook: Arc<dyn DecisionHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn callbacks(mut self, callbacks: CallbackQueue) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> NetworkResult<NetworkContext> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                NetworkError::Configuration(format!("no tokio runtime available: {e}"))
            })?,
        };

        let store: Arc<dyn CacheStore> = match (self.config.cache.enabled, self.store) {
            (false, _) => Arc::new(NoOpCacheStore::new()),
            (true, Some(store)) => store,
            (true, None) => Arc::new(MemoryCacheStore::new()),
        };

        let mut policy = CachePolicy::new(self.config.headers.clone())
            .with_date_only_fallback(self.config.cache.date_only_fallback);
        if let Some(hook) = self.hook {
            policy = policy.with_hook(hook);
        }

        let scheduler = AutoRefreshScheduler::new(self.clock.clone(), self.config.headers.clone())
            .with_default_backoff(Duration::from_secs(self.config.cache.default_backoff_secs))
            .with_enabled(self.config.scheduler.enabled);

        info!(
            cache_provider = store.provider_name(),
            refresh_enabled = self.config.scheduler.enabled,
            max_recovery_restarts = self.config.task.max_recovery_restarts,
            "🔧 NetworkContext initialized"
        );

        Ok(NetworkContext {
            fetcher: self.fetcher,
            cache: ResponseCache::new(store, policy, self.clock.clone()),
            scheduler: Arc::new(scheduler),
            config: Arc::new(self.config),
            callbacks: self.callbacks.unwrap_or_default(),
            clock: self.clock,
            runtime,
        })
    }
}
