#![allow(dead_code)]

pub mod mock_fetcher;
pub mod strategies;

pub use mock_fetcher::*;

use chrono::{DateTime, TimeZone, Utc};
use netask_core::clock::ManualClock;
use netask_core::config::NetaskConfig;
use netask_core::http::format_http_date;
use netask_core::task::{CallbackQueue, NetworkContext};
use std::sync::Arc;

pub const ITEMS_URL: &str = "https://api.example.com/items";

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn http_date(at: DateTime<Utc>) -> String {
    format_http_date(at)
}

/// Test harness: a scripted transport, a frozen clock and a context wired to both
pub struct Harness {
    pub fetcher: Arc<MockFetcher>,
    pub clock: Arc<ManualClock>,
    pub context: NetworkContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(NetaskConfig::default())
    }

    pub fn with_config(config: NetaskConfig) -> Self {
        let fetcher = Arc::new(MockFetcher::new());
        let clock = Arc::new(ManualClock::new(epoch()));
        let context = NetworkContext::builder(fetcher.clone())
            .config(config)
            .clock(clock.clone())
            .callbacks(CallbackQueue::serial("netask-test-callbacks"))
            .build()
            .unwrap();
        Self {
            fetcher,
            clock,
            context,
        }
    }
}
