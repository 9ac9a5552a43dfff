use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use netask_core::error::TransportError;
use netask_core::http::{HttpRequest, ResponseMetadata};
use netask_core::task::{FetchOutcome, Fetcher, ProgressSink};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted reaction of the mock transport
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(FetchOutcome),
    Delayed(Duration, FetchOutcome),
    /// Never resolves; only cancellation or the request timeout ends it
    Hang,
}

/// Transport that replays scripted outcomes in order and records every request
#[derive(Debug, Default)]
pub struct MockFetcher {
    script: Mutex<VecDeque<Scripted>>,
    repeat_last: Mutex<Option<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    progress_steps: Mutex<Vec<f64>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: FetchOutcome) -> &Self {
        self.script.lock().push_back(Scripted::Reply(outcome));
        self
    }

    pub fn push_delayed(&self, delay: Duration, outcome: FetchOutcome) -> &Self {
        self.script.lock().push_back(Scripted::Delayed(delay, outcome));
        self
    }

    pub fn push_hang(&self) -> &Self {
        self.script.lock().push_back(Scripted::Hang);
        self
    }

    /// Reaction used once the script runs dry
    pub fn always(&self, outcome: FetchOutcome) -> &Self {
        *self.repeat_last.lock() = Some(Scripted::Reply(outcome));
        self
    }

    /// Progress fractions reported before every reply
    pub fn report_progress(&self, steps: Vec<f64>) -> &Self {
        *self.progress_steps.lock() = steps;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: HttpRequest, progress: ProgressSink) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        let next = self
            .script
            .lock()
            .pop_front()
            .or_else(|| self.repeat_last.lock().clone());

        let steps = self.progress_steps.lock().clone();
        for step in steps {
            progress.report(step);
        }

        match next {
            Some(Scripted::Reply(outcome)) => outcome,
            Some(Scripted::Delayed(delay, outcome)) => {
                tokio::time::sleep(delay).await;
                outcome
            }
            Some(Scripted::Hang) => std::future::pending().await,
            None => FetchOutcome::failure(TransportError::Other("no scripted reply".to_string())),
        }
    }
}

pub fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

pub fn reply(status: u16, pairs: &[(&str, &str)], body: &'static str) -> FetchOutcome {
    let status = StatusCode::from_u16(status).unwrap();
    FetchOutcome::response(
        ResponseMetadata::new(status, headers(pairs), "https://api.example.com/items"),
        Bytes::from_static(body.as_bytes()),
    )
}

pub fn ok_json(pairs: &[(&str, &str)], body: &'static str) -> FetchOutcome {
    let mut all = vec![("content-type", "application/json")];
    all.extend_from_slice(pairs);
    reply(200, &all, body)
}
