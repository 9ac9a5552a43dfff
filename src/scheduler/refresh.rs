use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_REFRESH_BACKOFF;
use crate::http::{parse_http_date, HeaderAliases, HeaderField};
use crate::task::TaskId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use http::HeaderMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something a refresh timer can re-trigger
pub trait RefreshTarget: Send + Sync {
    /// Called on the runtime when the timer fires and the target is still alive
    fn refresh_fired(&self);
}

/// Compute when a response should be proactively re-fetched
///
/// `max(next_refresh, date + backoff, last_connection_end + backoff)`. Both a
/// next-refresh header and a `Date` header are required. Next-refresh accepts an
/// HTTP-date or delta-seconds relative to `Date`; backoff is integer seconds and falls
/// back to `default_backoff`.
pub fn compute_next_refresh(
    headers: &HeaderMap,
    aliases: &HeaderAliases,
    last_connection_end: Option<DateTime<Utc>>,
    default_backoff: Duration,
) -> Option<DateTime<Utc>> {
    let date = aliases
        .get(headers, HeaderField::Date)
        .and_then(parse_http_date)?;
    let raw_next = aliases.get(headers, HeaderField::NextRefresh)?;
    let next_refresh = parse_http_date(raw_next).or_else(|| {
        raw_next
            .parse::<i64>()
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|delta| date.checked_add_signed(delta))
    })?;

    let backoff = aliases
        .get(headers, HeaderField::Backoff)
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default_backoff);
    let backoff = chrono::Duration::from_std(backoff).ok()?;

    // Out-of-range sums schedule nothing
    let mut fire_at = next_refresh.max(date.checked_add_signed(backoff)?);
    if let Some(end) = last_connection_end {
        fire_at = fire_at.max(end.checked_add_signed(backoff)?);
    }
    Some(fire_at)
}

struct RefreshJob {
    job_id: u64,
    fire_at: DateTime<Utc>,
    token: CancellationToken,
    target: Weak<dyn RefreshTarget>,
}

impl std::fmt::Debug for RefreshJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshJob")
            .field("job_id", &self.job_id)
            .field("fire_at", &self.fire_at)
            .field("cancelled", &self.token.is_cancelled())
            .field("target_alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

/// Per-task one-shot timer registry
///
/// At most one live job per task; scheduling again cancels the previous job.
pub struct AutoRefreshScheduler {
    jobs: Arc<DashMap<TaskId, RefreshJob>>,
    next_job_id: AtomicU64,
    clock: Arc<dyn Clock>,
    aliases: HeaderAliases,
    default_backoff: Duration,
    enabled: bool,
}

impl std::fmt::Debug for AutoRefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoRefreshScheduler")
            .field("pending_jobs", &self.jobs.len())
            .field("default_backoff", &self.default_backoff)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for AutoRefreshScheduler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), HeaderAliases::default())
    }
}

impl AutoRefreshScheduler {
    pub fn new(clock: Arc<dyn Clock>, aliases: HeaderAliases) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            next_job_id: AtomicU64::new(1),
            clock,
            aliases,
            default_backoff: DEFAULT_REFRESH_BACKOFF,
            enabled: true,
        }
    }

    pub fn with_default_backoff(mut self, backoff: Duration) -> Self {
        self.default_backoff = backoff;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_scheduled(&self, task_id: TaskId) -> bool {
        self.jobs.contains_key(&task_id)
    }

    pub fn fire_time(&self, task_id: TaskId) -> Option<DateTime<Utc>> {
        self.jobs.get(&task_id).map(|job| job.fire_at)
    }

    /// Arm a timer from response headers; no refresh information cancels any pending job
    pub fn schedule_from_headers(
        &self,
        task_id: TaskId,
        target: Weak<dyn RefreshTarget>,
        headers: &HeaderMap,
        last_connection_end: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        match compute_next_refresh(
            headers,
            &self.aliases,
            last_connection_end,
            self.default_backoff,
        ) {
            Some(fire_at) => {
                self.schedule(task_id, target, fire_at);
                Some(fire_at)
            }
            None => {
                self.cancel(task_id);
                None
            }
        }
    }

    /// Register a one-shot job for `task_id`, replacing any pending one
    pub fn schedule(&self, task_id: TaskId, target: Weak<dyn RefreshTarget>, fire_at: DateTime<Utc>) {
        if !self.enabled {
            return;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "No runtime available, refresh not scheduled");
                return;
            }
        };

        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let job = RefreshJob {
            job_id,
            fire_at,
            token: token.clone(),
            target: target.clone(),
        };

        if let Some(previous) = self.jobs.insert(task_id, job) {
            previous.token.cancel();
            debug!(task_id = %task_id, job_id = previous.job_id, "Replaced pending refresh job");
        }

        let delay = (fire_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let jobs = Arc::clone(&self.jobs);

        info!(
            task_id = %task_id,
            job_id = job_id,
            fire_at = %fire_at,
            delay_ms = delay.as_millis() as u64,
            "⏰ Refresh scheduled"
        );

        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(task_id = %task_id, job_id = job_id, "Refresh job cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    jobs.remove_if(&task_id, |_, job| job.job_id == job_id);
                    match target.upgrade() {
                        Some(target) => {
                            debug!(task_id = %task_id, job_id = job_id, "Refresh job fired");
                            target.refresh_fired();
                        }
                        None => {
                            debug!(task_id = %task_id, job_id = job_id, "Refresh target gone");
                        }
                    }
                }
            }
        });
    }

    /// Cancel the pending job for `task_id`, if any
    pub fn cancel(&self, task_id: TaskId) -> bool {
        match self.jobs.remove(&task_id) {
            Some((_, job)) => {
                job.token.cancel();
                debug!(task_id = %task_id, job_id = job.job_id, "Refresh cancelled");
                true
            }
            None => false,
        }
    }

    /// Drop all state for a task that is going away
    pub fn deregister(&self, task_id: TaskId) {
        if self.cancel(task_id) {
            debug!(task_id = %task_id, "Task deregistered from refresh scheduler");
        }
    }

    pub fn cancel_all(&self) {
        self.jobs.retain(|_, job| {
            job.token.cancel();
            false
        });
    }
}

impl Drop for AutoRefreshScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
