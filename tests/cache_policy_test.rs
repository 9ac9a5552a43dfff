mod common;

use chrono::Duration as ChronoDuration;
use common::*;
use netask_core::cache::{CacheForeverHook, CachedEntry, DecisionHook};
use netask_core::clock::ManualClock;
use netask_core::config::NetaskConfig;
use netask_core::http::{HeaderAliases, HeaderField};
use netask_core::pipeline::Utf8Decoder;
use netask_core::task::{CallbackQueue, NetworkContext, NetworkTask, ResponseSource};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct RecordingHook {
    used: Mutex<Vec<String>>,
}

impl DecisionHook for RecordingHook {
    fn entry_used(&self, key: &str, _entry: &CachedEntry) {
        self.used.lock().push(key.to_string());
    }
}

fn context_with_hook(
    fetcher: Arc<MockFetcher>,
    clock: Arc<ManualClock>,
    hook: Arc<dyn DecisionHook>,
    config: NetaskConfig,
) -> NetworkContext {
    NetworkContext::builder(fetcher)
        .config(config)
        .clock(clock)
        .hook(hook)
        .callbacks(CallbackQueue::inline())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_cache_forever_hook_serves_expired_entries() {
    let fetcher = Arc::new(MockFetcher::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    let context = context_with_hook(
        fetcher.clone(),
        clock.clone(),
        Arc::new(CacheForeverHook),
        NetaskConfig::default(),
    );
    let date = http_date(epoch());
    fetcher.push(reply(
        200,
        &[("cache-control", "max-age=1"), ("date", date.as_str())],
        "payload",
    ));

    let task = NetworkTask::new(context.get(ITEMS_URL), context.clone(), Utf8Decoder);
    task.run().await.unwrap();

    clock.advance(ChronoDuration::days(30));
    let response = task.run().await.unwrap();
    assert_eq!(response.source, ResponseSource::Cache);
    assert_eq!(*response.value, "payload");
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_hook_is_told_about_served_entries() {
    let fetcher = Arc::new(MockFetcher::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    let hook = Arc::new(RecordingHook::default());
    let context = context_with_hook(
        fetcher.clone(),
        clock.clone(),
        hook.clone(),
        NetaskConfig::default(),
    );
    let date = http_date(epoch());
    fetcher.push(reply(
        200,
        &[("cache-control", "max-age=60"), ("date", date.as_str())],
        "payload",
    ));

    let task = NetworkTask::new(context.get(ITEMS_URL), context.clone(), Utf8Decoder);
    task.run().await.unwrap();
    assert!(hook.used.lock().is_empty());

    task.run().await.unwrap();
    assert_eq!(*hook.used.lock(), vec![ITEMS_URL.to_string()]);
}

#[tokio::test]
async fn test_configured_aliases_drive_freshness() {
    let fetcher = Arc::new(MockFetcher::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    let mut config = NetaskConfig::default();
    config.headers = HeaderAliases::default()
        .with_aliases(HeaderField::CacheControl, ["X-Cache-Policy", "Cache-Control"]);
    let context = context_with_hook(
        fetcher.clone(),
        clock.clone(),
        Arc::new(RecordingHook::default()),
        config,
    );
    let date = http_date(epoch());
    fetcher.push(reply(
        200,
        &[("x-cache-policy", "max-age=120"), ("date", date.as_str())],
        "aliased",
    ));

    let task = NetworkTask::new(context.get(ITEMS_URL), context.clone(), Utf8Decoder);
    task.run().await.unwrap();

    clock.advance(ChronoDuration::seconds(60));
    let response = task.run().await.unwrap();
    assert_eq!(response.source, ResponseSource::Cache);
    assert_eq!(fetcher.calls(), 1);
}
