use crate::constants::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{NetworkError, NetworkResult};
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduling hint passed through to the fetch collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Immutable request snapshot handed through the modifier pipeline to the fetcher
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
    pub priority: TaskPriority,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            priority: TaskPriority::default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header from string parts, rejecting invalid names or values
    pub fn try_header(self, name: &str, value: &str) -> NetworkResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| NetworkError::Internal(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| NetworkError::Internal(format!("invalid value for {name}: {e}")))?;
        Ok(self.with_header(name, value))
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Key under which responses to this request are cached.
    ///
    /// The method is deliberately not part of the key; the cache policy compares the
    /// stored method instead.
    pub fn cache_key(&self) -> String {
        self.url.clone()
    }

    /// Merge `headers` into this request, replacing existing values of the same name
    pub fn merge_headers(&mut self, headers: &HeaderMap) {
        for name in headers.keys() {
            self.headers.remove(name);
            for value in headers.get_all(name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_ignores_method() {
        let get = HttpRequest::get("https://api.example.com/feed");
        let head = HttpRequest::head("https://api.example.com/feed");
        assert_eq!(get.cache_key(), head.cache_key());
    }

    #[test]
    fn test_try_header_validation() {
        let request = HttpRequest::get("https://example.com")
            .try_header("Accept-Language", "de-DE, en;q=0.5")
            .unwrap();
        assert_eq!(request.headers["accept-language"], "de-DE, en;q=0.5");

        assert!(HttpRequest::get("https://example.com")
            .try_header("bad name", "x")
            .is_err());
    }

    #[test]
    fn test_merge_headers_replaces() {
        let mut request = HttpRequest::get("https://example.com")
            .try_header("If-None-Match", "\"old\"")
            .unwrap();
        let mut update = HeaderMap::new();
        update.insert("if-none-match", HeaderValue::from_static("\"new\""));
        request.merge_headers(&update);
        assert_eq!(request.headers.get_all("if-none-match").iter().count(), 1);
        assert_eq!(request.headers["if-none-match"], "\"new\"");
    }
}
