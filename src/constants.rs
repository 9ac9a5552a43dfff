//! System constants shared across the cache, scheduler and task modules.

use std::time::Duration;

/// Backoff applied by the refresh scheduler when no backoff header is present
pub const DEFAULT_REFRESH_BACKOFF: Duration = Duration::from_secs(60);

/// Timeout for requests constructed without an explicit one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `start_blocking()` waits this many request timeouts before giving up
pub const DEFAULT_SYNCHRONOUS_TIMEOUT_MULTIPLIER: u32 = 2;

/// Recovery restarts allowed per `start()`
pub const DEFAULT_MAX_RECOVERY_RESTARTS: u32 = 3;

/// Window used by the heuristic Date-only freshness fallback (three weeks)
pub const DEFAULT_HEURISTIC_WINDOW_SECS: u64 = 21 * 24 * 60 * 60;

/// Default header-name aliases per semantic header field
pub mod header_aliases {
    pub const CACHE_CONTROL: &[&str] = &["Cache-Control"];
    pub const EXPIRES: &[&str] = &["Expires"];
    pub const DATE: &[&str] = &["Date"];
    pub const AGE: &[&str] = &["Age"];
    pub const ETAG: &[&str] = &["ETag"];
    pub const LAST_MODIFIED: &[&str] = &["Last-Modified"];
    pub const CONTENT_LANGUAGE: &[&str] = &["Content-Language"];
    pub const ACCEPT_LANGUAGE: &[&str] = &["Accept-Language"];
    pub const IF_NONE_MATCH: &[&str] = &["If-None-Match"];
    pub const IF_MODIFIED_SINCE: &[&str] = &["If-Modified-Since"];
    pub const CONTENT_TYPE: &[&str] = &["Content-Type"];
    pub const NEXT_REFRESH: &[&str] = &["Next-Refresh", "X-Next-Refresh", "X-Refresh-At", "X-Poll-At"];
    pub const BACKOFF: &[&str] = &["Backoff", "X-Backoff", "X-Refresh-Backoff", "X-Poll-Interval"];
}

/// Methods whose successful responses may be stored
pub const CACHEABLE_METHODS: &[&str] = &["GET", "HEAD"];
