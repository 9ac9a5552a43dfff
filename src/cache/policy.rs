//! # Cache Policy Evaluator
//!
//! Decides whether a stored response may be reused for a request. [`CachePolicy::evaluate`]
//! is pure: it never touches the store and never fails. Whether the stored entry should be
//! dropped is reported through [`MissReason::evicts`], and the caller performs the removal.
//!
//! Evaluation order:
//!
//! 1. no entry → Miss
//! 2. stored status not 2xx → Miss, evict
//! 3. stored method differs from the request method → Miss
//! 4. Cache-Control `no-cache`/`no-store` → Miss, evict
//! 5. content language incompatible with Accept-Language → Miss
//! 6. `age = ceil(now - Date) + Age`
//! 7. `s-maxage`/`max-age`: negative age → Miss; past lifetime → Expired; else Hit
//! 8. `Expires`: past → Expired; future → Hit
//! 9. only `Date`: [`DateOnlyFallback`]
//! 10. nothing usable → Miss, evict
//!
//! Every branch hands its proposal and, where the entry could be served at all, a
//! "possible hit" to the configured [`DecisionHook`], which has the final word.

use super::control::CacheControl;
use super::entry::{CachedEntry, StoragePolicy};
use super::language::is_language_compatible;
use crate::constants::{CACHEABLE_METHODS, DEFAULT_HEURISTIC_WINDOW_SECS};
use crate::http::{parse_http_date, HeaderAliases, HeaderField, HttpRequest, ResponseMetadata, StatusCategory};
use chrono::{DateTime, Utc};
use http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Why a lookup produced no usable entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    NoEntry,
    UnsuccessfulStatus,
    MethodMismatch,
    CachingDisallowed,
    LanguageMismatch,
    ClockSkew,
    NoFreshnessInformation,
}

impl MissReason {
    /// Whether the stored entry must be removed from the store
    pub fn evicts(&self) -> bool {
        matches!(
            self,
            Self::UnsuccessfulStatus | Self::CachingDisallowed | Self::NoFreshnessInformation
        )
    }
}

#[derive(Debug, Clone)]
pub enum CacheDecision {
    Miss(MissReason),
    Expired {
        entry: CachedEntry,
        reload_headers: HeaderMap,
    },
    Hit {
        entry: CachedEntry,
        reload_headers: HeaderMap,
    },
}

impl CacheDecision {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }

    pub fn entry(&self) -> Option<&CachedEntry> {
        match self {
            Self::Hit { entry, .. } | Self::Expired { entry, .. } => Some(entry),
            Self::Miss(_) => None,
        }
    }

    pub fn reload_headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Hit { reload_headers, .. } | Self::Expired { reload_headers, .. } => {
                Some(reload_headers)
            }
            Self::Miss(_) => None,
        }
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            Self::Miss(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Turn a Hit into an Expired decision over the same entry
    pub fn into_expired(self) -> Self {
        match self {
            Self::Hit {
                entry,
                reload_headers,
            } => Self::Expired {
                entry,
                reload_headers,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Miss(_) => "miss",
            Self::Expired { .. } => "expired",
            Self::Hit { .. } => "hit",
        }
    }
}

impl fmt::Display for CacheDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miss(reason) => write!(f, "miss ({reason:?})"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Evaluation step that produced a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionStage {
    NoEntry,
    Status,
    Method,
    CacheControl,
    Language,
    MaxAge,
    Expires,
    DateOnly,
    NoFreshness,
}

/// Inputs available to a [`DecisionHook`]
#[derive(Debug, Clone)]
pub struct DecisionContext<'a> {
    pub request: &'a HttpRequest,
    pub now: DateTime<Utc>,
    pub stage: DecisionStage,
    /// `ceil(now - date)` plus the Age header, in seconds, once computed
    pub age_secs: Option<i64>,
    /// `s-maxage`/`max-age` when present
    pub freshness_lifetime: Option<u64>,
}

/// Policy override point consulted on every branch of the evaluation
pub trait DecisionHook: Send + Sync + fmt::Debug {
    fn remap(
        &self,
        proposed: CacheDecision,
        possible_hit: Option<CacheDecision>,
        ctx: &DecisionContext<'_>,
    ) -> CacheDecision {
        let _ = (possible_hit, ctx);
        proposed
    }

    /// Called when a stored entry was served (directly or after a 304)
    fn entry_used(&self, _key: &str, _entry: &CachedEntry) {}
}

/// Standard HTTP semantics, no remapping
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHook;

impl DecisionHook for DefaultHook {}

/// Serve any servable entry regardless of freshness
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheForeverHook;

impl DecisionHook for CacheForeverHook {
    fn remap(
        &self,
        proposed: CacheDecision,
        possible_hit: Option<CacheDecision>,
        _ctx: &DecisionContext<'_>,
    ) -> CacheDecision {
        possible_hit.unwrap_or(proposed)
    }
}

/// Keep serving an expired entry for `max_stale_secs` past its lifetime
#[derive(Debug, Clone, Copy)]
pub struct StaleExtensionHook {
    pub max_stale_secs: u64,
}

impl DecisionHook for StaleExtensionHook {
    fn remap(
        &self,
        proposed: CacheDecision,
        possible_hit: Option<CacheDecision>,
        ctx: &DecisionContext<'_>,
    ) -> CacheDecision {
        if !proposed.is_expired() {
            return proposed;
        }
        let Some(age) = ctx.age_secs else {
            return proposed;
        };
        let limit = ctx
            .freshness_lifetime
            .unwrap_or(0)
            .saturating_add(self.max_stale_secs);
        match possible_hit {
            Some(hit) if age >= 0 && (age as u64) <= limit => hit,
            _ => proposed,
        }
    }
}

/// What to do with an entry that carries a Date but no explicit freshness information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DateOnlyFallback {
    /// Always revalidate
    #[default]
    Expired,
    /// Treat as fresh while younger than `window_secs`
    Heuristic { window_secs: u64 },
}

impl DateOnlyFallback {
    pub fn heuristic_default() -> Self {
        Self::Heuristic {
            window_secs: DEFAULT_HEURISTIC_WINDOW_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachePolicy {
    aliases: HeaderAliases,
    date_only_fallback: DateOnlyFallback,
    hook: Arc<dyn DecisionHook>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(HeaderAliases::default())
    }
}

impl CachePolicy {
    pub fn new(aliases: HeaderAliases) -> Self {
        Self {
            aliases,
            date_only_fallback: DateOnlyFallback::default(),
            hook: Arc::new(DefaultHook),
        }
    }

    pub fn with_date_only_fallback(mut self, fallback: DateOnlyFallback) -> Self {
        self.date_only_fallback = fallback;
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn DecisionHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn aliases(&self) -> &HeaderAliases {
        &self.aliases
    }

    /// Decide whether `entry` may serve `request` at `now`
    pub fn evaluate(
        &self,
        entry: Option<&CachedEntry>,
        request: &HttpRequest,
        response_headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> CacheDecision {
        let mut ctx = DecisionContext {
            request,
            now,
            stage: DecisionStage::NoEntry,
            age_secs: None,
            freshness_lifetime: None,
        };

        let Some(entry) = entry else {
            return self.decide(CacheDecision::Miss(MissReason::NoEntry), None, &ctx);
        };

        if StatusCategory::of(entry.status) != StatusCategory::Success {
            ctx.stage = DecisionStage::Status;
            return self.decide(
                CacheDecision::Miss(MissReason::UnsuccessfulStatus),
                None,
                &ctx,
            );
        }

        if entry.metadata.method != request.method {
            ctx.stage = DecisionStage::Method;
            return self.decide(CacheDecision::Miss(MissReason::MethodMismatch), None, &ctx);
        }

        let reload_headers = self.reload_headers(entry);
        let hit = || CacheDecision::Hit {
            entry: entry.clone(),
            reload_headers: reload_headers.clone(),
        };
        let expired = || CacheDecision::Expired {
            entry: entry.clone(),
            reload_headers: reload_headers.clone(),
        };

        let cache_control = self
            .aliases
            .get_joined(response_headers, HeaderField::CacheControl)
            .map(|value| CacheControl::parse(&value));

        if let Some(cc) = &cache_control {
            if !cc.allows_caching() {
                ctx.stage = DecisionStage::CacheControl;
                return self.decide(
                    CacheDecision::Miss(MissReason::CachingDisallowed),
                    Some(hit()),
                    &ctx,
                );
            }
        }

        if !is_language_compatible(entry, request, &self.aliases) {
            ctx.stage = DecisionStage::Language;
            return self.decide(
                CacheDecision::Miss(MissReason::LanguageMismatch),
                Some(hit()),
                &ctx,
            );
        }

        let response_date = self
            .aliases
            .get(response_headers, HeaderField::Date)
            .and_then(parse_http_date);
        let elapsed_ms = self.elapsed_millis(
            response_date.unwrap_or(entry.metadata.stored_at),
            response_headers,
            now,
        );
        let age_secs = ceil_seconds(elapsed_ms);
        ctx.age_secs = Some(age_secs);

        if let Some(lifetime) = cache_control.as_ref().and_then(CacheControl::freshness_lifetime) {
            ctx.stage = DecisionStage::MaxAge;
            ctx.freshness_lifetime = Some(lifetime);
            let proposed = if age_secs < 0 {
                CacheDecision::Miss(MissReason::ClockSkew)
            } else if elapsed_ms >= lifetime_millis(lifetime) {
                expired()
            } else {
                hit()
            };
            return self.decide(proposed, Some(hit()), &ctx);
        }

        if let Some(expires) = self.aliases.get(response_headers, HeaderField::Expires) {
            ctx.stage = DecisionStage::Expires;
            // An unparseable Expires (commonly "0" or "-1") means already expired
            let proposed = match parse_http_date(expires) {
                Some(at) if at > now => hit(),
                _ => expired(),
            };
            return self.decide(proposed, Some(hit()), &ctx);
        }

        if response_date.is_some() {
            ctx.stage = DecisionStage::DateOnly;
            let proposed = match self.date_only_fallback {
                DateOnlyFallback::Expired => expired(),
                DateOnlyFallback::Heuristic { window_secs } => {
                    if age_secs >= 0 && elapsed_ms < lifetime_millis(window_secs) {
                        hit()
                    } else {
                        expired()
                    }
                }
            };
            return self.decide(proposed, Some(hit()), &ctx);
        }

        ctx.stage = DecisionStage::NoFreshness;
        self.decide(
            CacheDecision::Miss(MissReason::NoFreshnessInformation),
            Some(hit()),
            &ctx,
        )
    }

    fn decide(
        &self,
        proposed: CacheDecision,
        possible_hit: Option<CacheDecision>,
        ctx: &DecisionContext<'_>,
    ) -> CacheDecision {
        self.hook.remap(proposed, possible_hit, ctx)
    }

    fn elapsed_millis(
        &self,
        date: DateTime<Utc>,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> i64 {
        let age_header_secs = self
            .aliases
            .get(headers, HeaderField::Age)
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|secs| *secs >= 0)
            .unwrap_or(0);
        (now - date)
            .num_milliseconds()
            .saturating_add(age_header_secs.saturating_mul(1000))
    }

    /// Conditional request headers built from the entry's validators
    pub fn reload_headers(&self, entry: &CachedEntry) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs = [
            (HeaderField::ETag, HeaderField::IfNoneMatch),
            (HeaderField::LastModified, HeaderField::IfModifiedSince),
        ];
        for (source, target) in pairs {
            let Some(value) = self.aliases.get(&entry.headers, source) else {
                continue;
            };
            let (Some(name), Ok(value)) = (
                self.aliases.canonical_name(target),
                HeaderValue::from_str(value),
            ) else {
                continue;
            };
            headers.insert(name, value);
        }
        headers
    }

    /// Record that `entry` was served for `key`
    pub fn did_use_entry(&self, key: &str, entry: &CachedEntry) {
        debug!(key = %key, status = %entry.status, "Cached entry used");
        self.hook.entry_used(key, entry);
    }

    /// Decide whether a fresh network response may be persisted
    pub fn storage_policy_for(
        &self,
        request: &HttpRequest,
        response: &ResponseMetadata,
    ) -> StoragePolicy {
        if !response.is_success() || !CACHEABLE_METHODS.contains(&request.method.as_str()) {
            return StoragePolicy::NotAllowed;
        }

        match self
            .aliases
            .get_joined(&response.headers, HeaderField::CacheControl)
            .map(|value| CacheControl::parse(&value))
        {
            Some(cc) if !cc.allows_caching() => StoragePolicy::NotAllowed,
            Some(cc) if cc.private => StoragePolicy::AllowedInMemoryOnly,
            _ => StoragePolicy::Allowed,
        }
    }
}

fn ceil_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) != 0)
}

fn lifetime_millis(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX / 1000).saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::EntryMetadata;
    use crate::http::format_http_date;
    use bytes::Bytes;
    use chrono::{Duration, TimeZone};
    use http::{Method, StatusCode};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn entry_with(headers: &[(&'static str, String)]) -> CachedEntry {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        CachedEntry {
            status: StatusCode::OK,
            headers: map,
            body: Bytes::from_static(b"payload"),
            metadata: EntryMetadata {
                method: Method::GET,
                accept_language: None,
                stored_at: t0(),
            },
            storage_policy: StoragePolicy::Allowed,
        }
    }

    fn evaluate_at(policy: &CachePolicy, entry: &CachedEntry, now: DateTime<Utc>) -> CacheDecision {
        let request = HttpRequest::get("https://example.com/feed");
        policy.evaluate(Some(entry), &request, &entry.headers, now)
    }

    #[test]
    fn test_no_entry_is_miss() {
        let policy = CachePolicy::default();
        let request = HttpRequest::get("https://example.com");
        let decision = policy.evaluate(None, &request, &HeaderMap::new(), t0());
        assert_eq!(decision.miss_reason(), Some(MissReason::NoEntry));
        assert!(!MissReason::NoEntry.evicts());
    }

    #[test]
    fn test_unsuccessful_status_evicts() {
        let policy = CachePolicy::default();
        let mut entry = entry_with(&[("cache-control", "max-age=60".into())]);
        entry.status = StatusCode::INTERNAL_SERVER_ERROR;
        let decision = evaluate_at(&policy, &entry, t0());
        assert_eq!(decision.miss_reason(), Some(MissReason::UnsuccessfulStatus));
        assert!(MissReason::UnsuccessfulStatus.evicts());
    }

    #[test]
    fn test_method_mismatch_is_miss() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=60".into()),
        ]);
        let request = HttpRequest::head("https://example.com/feed");
        let decision = policy.evaluate(Some(&entry), &request, &entry.headers, t0());
        assert_eq!(decision.miss_reason(), Some(MissReason::MethodMismatch));
    }

    #[test]
    fn test_no_store_is_miss_and_evicts() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "no-store, max-age=60".into()),
        ]);
        let decision = evaluate_at(&policy, &entry, t0());
        assert_eq!(decision.miss_reason(), Some(MissReason::CachingDisallowed));
        assert!(MissReason::CachingDisallowed.evicts());
    }

    #[test]
    fn test_max_age_window() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=60".into()),
        ]);

        assert!(evaluate_at(&policy, &entry, t0()).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(59)).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::milliseconds(59_999)).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(60)).is_expired());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(3600)).is_expired());
    }

    #[test]
    fn test_sub_second_skew_is_not_a_miss() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=60".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() - Duration::milliseconds(400)).is_hit());
        assert_eq!(
            evaluate_at(&policy, &entry, t0() - Duration::seconds(2)).miss_reason(),
            Some(MissReason::ClockSkew)
        );
    }

    #[test]
    fn test_age_header_counts_toward_age() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("age", "50".into()),
            ("cache-control", "max-age=60".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(5)).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(10)).is_expired());
    }

    #[test]
    fn test_extreme_age_header_is_expired() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("age", i64::MAX.to_string()),
            ("cache-control", "max-age=60".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0()).is_expired());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(5)).is_expired());
    }

    #[test]
    fn test_stale_extension_saturates_limit() {
        let policy = CachePolicy::default().with_hook(Arc::new(StaleExtensionHook {
            max_stale_secs: u64::MAX,
        }));
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=60".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() + Duration::days(365)).is_hit());
    }

    #[test]
    fn test_expires_header() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("expires", format_http_date(t0() + Duration::seconds(120))),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(30)).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(121)).is_expired());

        let bogus = entry_with(&[("expires", "0".into())]);
        assert!(evaluate_at(&policy, &bogus, t0()).is_expired());
    }

    #[test]
    fn test_date_only_fallback_is_configurable() {
        let entry = entry_with(&[("date", format_http_date(t0()))]);
        let strict = CachePolicy::default();
        assert!(evaluate_at(&strict, &entry, t0() + Duration::seconds(1)).is_expired());

        let heuristic = CachePolicy::default().with_date_only_fallback(DateOnlyFallback::Heuristic {
            window_secs: 3600,
        });
        assert!(evaluate_at(&heuristic, &entry, t0() + Duration::seconds(10)).is_hit());
        assert!(evaluate_at(&heuristic, &entry, t0() + Duration::seconds(7200)).is_expired());
    }

    #[test]
    fn test_no_freshness_information_evicts() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[("etag", "\"abc\"".into())]);
        let decision = evaluate_at(&policy, &entry, t0());
        assert_eq!(decision.miss_reason(), Some(MissReason::NoFreshnessInformation));
    }

    #[test]
    fn test_reload_headers_from_validators() {
        let policy = CachePolicy::default();
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=1".into()),
            ("etag", "\"abc\"".into()),
            ("last-modified", format_http_date(t0() - Duration::days(1))),
        ]);
        let decision = evaluate_at(&policy, &entry, t0() + Duration::seconds(5));
        let reload = decision.reload_headers().unwrap();
        assert_eq!(reload["if-none-match"], "\"abc\"");
        assert_eq!(
            reload["if-modified-since"],
            format_http_date(t0() - Duration::days(1)).as_str()
        );
    }

    #[test]
    fn test_cache_forever_hook() {
        let policy = CachePolicy::default().with_hook(Arc::new(CacheForeverHook));
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=1".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() + Duration::days(30)).is_hit());

        let mut failed = entry.clone();
        failed.status = StatusCode::NOT_FOUND;
        assert!(evaluate_at(&policy, &failed, t0()).is_miss());
    }

    #[test]
    fn test_stale_extension_hook() {
        let policy = CachePolicy::default().with_hook(Arc::new(StaleExtensionHook {
            max_stale_secs: 30,
        }));
        let entry = entry_with(&[
            ("date", format_http_date(t0())),
            ("cache-control", "max-age=60".into()),
        ]);
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(80)).is_hit());
        assert!(evaluate_at(&policy, &entry, t0() + Duration::seconds(95)).is_expired());
    }

    #[test]
    fn test_storage_policy() {
        let policy = CachePolicy::default();
        let request = HttpRequest::get("https://example.com");
        let mut headers = HeaderMap::new();
        headers.insert("cache-control", HeaderValue::from_static("no-store"));
        let response = ResponseMetadata::new(StatusCode::OK, headers, "https://example.com");
        assert_eq!(
            policy.storage_policy_for(&request, &response),
            StoragePolicy::NotAllowed
        );

        let mut headers = HeaderMap::new();
        headers.insert("cache-control", HeaderValue::from_static("private, max-age=5"));
        let response = ResponseMetadata::new(StatusCode::OK, headers, "https://example.com");
        assert_eq!(
            policy.storage_policy_for(&request, &response),
            StoragePolicy::AllowedInMemoryOnly
        );

        let post = HttpRequest::new(Method::POST, "https://example.com");
        let response = ResponseMetadata::new(StatusCode::OK, HeaderMap::new(), "https://example.com");
        assert_eq!(
            policy.storage_policy_for(&post, &response),
            StoragePolicy::NotAllowed
        );
    }

    #[test]
    fn test_ceil_seconds() {
        assert_eq!(ceil_seconds(0), 0);
        assert_eq!(ceil_seconds(1), 1);
        assert_eq!(ceil_seconds(1000), 1);
        assert_eq!(ceil_seconds(1001), 2);
        assert_eq!(ceil_seconds(-400), 0);
        assert_eq!(ceil_seconds(-1000), -1);
        assert_eq!(ceil_seconds(-1400), -1);
    }
}
