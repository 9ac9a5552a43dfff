use super::fetch::FetchOutcome;
use crate::http::HttpRequest;
use async_trait::async_trait;

/// Gets first refusal on every outgoing request
///
/// Returning `Some` short-circuits the fetch with a synthetic outcome; a synthetic
/// outcome without response metadata is treated as `200 OK`.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn intercept(&self, request: &HttpRequest) -> Option<FetchOutcome>;
}
