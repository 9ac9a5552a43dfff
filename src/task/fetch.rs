//! Boundary to the byte-transport collaborator.

use crate::error::TransportError;
use crate::http::{HttpRequest, ResponseMetadata};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Result of handing a request to the transport
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub body: Bytes,
    /// `None` when no HTTP response was received
    pub response: Option<ResponseMetadata>,
    pub error: Option<TransportError>,
}

impl FetchOutcome {
    pub fn response(response: ResponseMetadata, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            response: Some(response),
            error: None,
        }
    }

    pub fn failure(error: TransportError) -> Self {
        Self {
            body: Bytes::new(),
            response: None,
            error: Some(error),
        }
    }
}

/// Callback for transfer progress, as a fraction in `[0, 1]`
#[derive(Clone)]
pub struct ProgressSink {
    report: Arc<dyn Fn(f64) + Send + Sync>,
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProgressSink")
    }
}

impl ProgressSink {
    pub fn new(report: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self {
            report: Arc::new(report),
        }
    }

    /// Sink that discards reports
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    pub fn report(&self, fraction: f64) {
        (self.report)(fraction);
    }

    pub fn report_bytes(&self, received: u64, total: Option<u64>) {
        if let Some(total) = total.filter(|t| *t > 0) {
            self.report(received as f64 / total as f64);
        }
    }
}

/// Performs the actual HTTP exchange; the core never opens a socket
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: HttpRequest, progress: ProgressSink) -> FetchOutcome;
}
