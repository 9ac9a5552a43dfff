//! Request modifiers run, in order, before a request is handed to the fetcher.

use super::invocation::InvocationSlot;
use crate::error::{NetworkError, NetworkResult};
use crate::http::HttpRequest;
use async_trait::async_trait;
use http::{HeaderName, HeaderValue};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One transform applied to an outgoing request
#[async_trait]
pub trait RequestModifier: Send + Sync {
    /// Transform `request`; long-running modifiers should watch `token`
    async fn modify(
        &self,
        request: HttpRequest,
        token: &CancellationToken,
    ) -> NetworkResult<HttpRequest>;

    fn name(&self) -> &str;
}

/// Ordered, cancelable chain of [`RequestModifier`]s
///
/// Re-running the pipeline cancels a still-pending earlier run. Side effects of steps
/// that already completed are not rolled back.
#[derive(Default)]
pub struct ModifierPipeline {
    modifiers: RwLock<Vec<Arc<dyn RequestModifier>>>,
    slot: InvocationSlot,
}

impl std::fmt::Debug for ModifierPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .modifiers
            .read()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        f.debug_struct("ModifierPipeline")
            .field("modifiers", &names)
            .field("active", &self.slot.is_active())
            .finish()
    }
}

impl ModifierPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, modifier: Arc<dyn RequestModifier>) {
        self.modifiers.write().push(modifier);
    }

    pub fn clear(&self) {
        self.modifiers.write().clear();
    }

    pub fn len(&self) -> usize {
        self.modifiers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.read().is_empty()
    }

    /// Run every modifier in order, stopping at the first failure
    pub async fn run(
        &self,
        request: HttpRequest,
        parent: &CancellationToken,
    ) -> NetworkResult<HttpRequest> {
        let token = self.slot.begin(parent);
        let modifiers = self.modifiers.read().clone();
        let mut request = request;

        for modifier in modifiers {
            if token.is_cancelled() {
                return Err(NetworkError::Cancelled);
            }
            debug!(modifier = modifier.name(), url = %request.url, "Applying request modifier");
            request = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(NetworkError::Cancelled),
                result = modifier.modify(request, &token) => result?,
            };
        }

        if token.is_cancelled() {
            return Err(NetworkError::Cancelled);
        }
        Ok(request)
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

/// Sets a header on every request, replacing existing values
#[derive(Debug, Clone)]
pub struct HeaderModifier {
    name: HeaderName,
    value: HeaderValue,
    label: String,
}

impl HeaderModifier {
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        let label = format!("header:{name}");
        Self { name, value, label }
    }

    pub fn try_new(name: &str, value: &str) -> NetworkResult<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| NetworkError::modifier(name, e.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| NetworkError::modifier(name, e.to_string()))?;
        Ok(Self::new(header_name, header_value))
    }
}

#[async_trait]
impl RequestModifier for HeaderModifier {
    async fn modify(
        &self,
        mut request: HttpRequest,
        _token: &CancellationToken,
    ) -> NetworkResult<HttpRequest> {
        request.headers.insert(self.name.clone(), self.value.clone());
        Ok(request)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Wraps a synchronous closure as a modifier
pub struct FnModifier<F> {
    name: String,
    f: F,
}

impl<F> FnModifier<F>
where
    F: Fn(HttpRequest) -> NetworkResult<HttpRequest> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> RequestModifier for FnModifier<F>
where
    F: Fn(HttpRequest) -> NetworkResult<HttpRequest> + Send + Sync,
{
    async fn modify(
        &self,
        request: HttpRequest,
        _token: &CancellationToken,
    ) -> NetworkResult<HttpRequest> {
        (self.f)(request)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
