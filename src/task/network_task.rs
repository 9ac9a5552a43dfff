//! # Network Task
//!
//! Orchestrates one request through cache lookup, modifiers, fetch, validation, caching,
//! decoding and recovery, and reports exactly one completion per attempt.
//!
//! ## Attempt lifecycle
//!
//! ```text
//! start() ──► WaitingExecution ──► (cache Hit) ──► Parsing ──► Finished
//!                    │
//!                    ├─ modifiers ─ interceptor? ─► Fetching ─► classify
//!                    │                                            ├─ success ─► Parsing ─► Finished
//!                    │                                            ├─ 304 ─────► Parsing ─► Finished
//!                    │                                            └─ failure ─► recovery
//!                    └─ cancel() ─► Cancelled
//! ```
//!
//! Every attempt carries a generation number and a cancellation token. Starting again
//! or cancelling bumps/cancels them, so results of a superseded attempt are dropped
//! and never reach observers.

use super::context::NetworkContext;
use super::fetch::{FetchOutcome, ProgressSink};
use super::flags::TaskFlags;
use super::handle::{TaskControl, TaskHandle};
use super::interceptor::RequestInterceptor;
use super::observers::{CompletionWaiter, TaskObservers};
use crate::cache::{CacheDecision, CachedEntry};
use crate::error::{NetworkError, NetworkResult, ProtocolError, TransportError};
use crate::http::{HttpRequest, ResponseMetadata, TaskPriority};
use crate::pipeline::{
    Decoder, ErrorBodyDecoder, ModifierPipeline, RecoveryContext, RecoveryOutcome,
    RecoveryPipeline, RecoveryStrategy, RequestModifier, ResponseValidator, ValidatorChain,
};
use crate::scheduler::RefreshTarget;
use crate::state_machine::{TaskEvent, TaskState, TaskStateMachine};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a successful result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Network,
    Cache,
    Revalidated,
    Interceptor,
    Recovery,
}

#[derive(Debug)]
pub struct TaskResponse<T> {
    pub value: Arc<T>,
    pub response: Option<ResponseMetadata>,
    pub source: ResponseSource,
}

impl<T> Clone for TaskResponse<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            response: self.response.clone(),
            source: self.source,
        }
    }
}

pub type TaskResult<T> = Result<TaskResponse<T>, NetworkError>;

enum Step {
    Done,
    Restart(NetworkError),
}

struct AttemptState {
    generation: u64,
    token: CancellationToken,
}

struct ProgressState {
    generation: u64,
    value: f64,
}

/// A completed attempt awaiting delivery outside the mutation guard
struct Finished<T> {
    result: TaskResult<T>,
    waiters: Vec<CompletionWaiter<T>>,
}

pub(crate) struct TaskInner<T> {
    id: TaskId,
    weak_self: Weak<TaskInner<T>>,
    context: NetworkContext,
    state: TaskStateMachine,

    // Serializes start/cancel/finish; never held across an await
    guard: Mutex<()>,
    attempt: Mutex<AttemptState>,

    request: RwLock<HttpRequest>,
    flags: RwLock<TaskFlags>,
    progress: Mutex<ProgressState>,
    last_connection_end: RwLock<Option<DateTime<Utc>>>,

    modifiers: ModifierPipeline,
    validators: ValidatorChain,
    recovery: RecoveryPipeline,
    decoder: RwLock<Arc<dyn Decoder<T>>>,
    error_decoder: RwLock<Option<Arc<dyn ErrorBodyDecoder>>>,
    interceptor: RwLock<Option<Arc<dyn RequestInterceptor>>>,
    observers: TaskObservers<T>,
}

impl<T: Send + Sync + 'static> TaskInner<T> {
    fn new(request: HttpRequest, context: NetworkContext, decoder: Arc<dyn Decoder<T>>) -> Arc<Self> {
        let id = TaskId::new();
        Arc::new_cyclic(|weak_self| Self {
            id,
            weak_self: weak_self.clone(),
            state: TaskStateMachine::new(id, context.callbacks.clone()),
            context,
            guard: Mutex::new(()),
            attempt: Mutex::new(AttemptState {
                generation: 0,
                token: CancellationToken::new(),
            }),
            request: RwLock::new(request),
            flags: RwLock::new(TaskFlags::default()),
            progress: Mutex::new(ProgressState {
                generation: 0,
                value: 0.0,
            }),
            last_connection_end: RwLock::new(None),
            modifiers: ModifierPipeline::new(),
            validators: ValidatorChain::new(),
            recovery: RecoveryPipeline::new(),
            decoder: RwLock::new(decoder),
            error_decoder: RwLock::new(None),
            interceptor: RwLock::new(None),
            observers: TaskObservers::default(),
        })
    }

    fn handle(&self) -> TaskHandle {
        let control: Weak<dyn TaskControl> = self.weak_self.clone();
        TaskHandle::new(self.id, control)
    }

    fn is_current(&self, generation: u64) -> bool {
        let attempt = self.attempt.lock();
        attempt.generation == generation && !attempt.token.is_cancelled()
    }

    fn start_with(self: &Arc<Self>, flags: TaskFlags, waiter: Option<CompletionWaiter<T>>) -> bool {
        let _guard = self.guard.lock();
        if let Some(waiter) = waiter {
            self.observers.add_waiter(waiter);
        }
        self.start_locked(flags)
    }

    /// Begin a new attempt; the mutation guard must be held
    fn start_locked(self: &Arc<Self>, flags: TaskFlags) -> bool {
        let (generation, token) = {
            let mut attempt = self.attempt.lock();
            attempt.token.cancel();
            attempt.generation += 1;
            attempt.token = CancellationToken::new();
            (attempt.generation, attempt.token.clone())
        };
        self.modifiers.cancel();
        self.recovery.cancel();

        // A superseded attempt goes through Cancelled without a completion
        if let Err(e) = self
            .state
            .transition_when(TaskEvent::Cancel, |state| state.is_cancellable())
        {
            warn!(task_id = %self.id, error = %e, "Could not supersede previous attempt");
            return false;
        }
        if let Err(e) = self.state.transition(TaskEvent::Enqueue) {
            warn!(task_id = %self.id, error = %e, "Could not enqueue task");
            return false;
        }

        *self.flags.write() = flags;
        *self.progress.lock() = ProgressState {
            generation,
            value: 0.0,
        };

        info!(
            task_id = %self.id,
            url = %self.request.read().url,
            generation = generation,
            system_triggered = flags.system_triggered,
            refresh = flags.refresh,
            "🚀 Task started"
        );

        let this = Arc::clone(self);
        self.context
            .runtime
            .spawn(async move { this.run(generation, token).await });
        true
    }

    fn start_refresh(self: &Arc<Self>) {
        let _guard = self.guard.lock();
        let state = self.state.current_state();
        if state.is_active() {
            debug!(task_id = %self.id, state = %state, "Skipping refresh, attempt in flight");
            return;
        }
        let flags = TaskFlags {
            ignore_cache: self.flags.read().ignore_cache,
            ..TaskFlags::refresh()
        };
        self.start_locked(flags);
    }

    fn cancel(&self, report: bool) -> bool {
        let (transitioned, waiters) = {
            let _guard = self.guard.lock();
            let transitioned = self.cancel_locked(report);
            let waiters = if transitioned && report {
                self.observers.take_waiters()
            } else {
                Vec::new()
            };
            (transitioned, waiters)
        };
        if transitioned && report {
            self.observers.notify_completion(
                &self.context.callbacks,
                Err(NetworkError::Cancelled),
                waiters,
            );
        }
        transitioned
    }

    /// The mutation guard must be held
    fn cancel_locked(&self, report: bool) -> bool {
        let transitioned = match self
            .state
            .transition_when(TaskEvent::Cancel, |state| state.is_cancellable())
        {
            Ok(result) => result.is_some(),
            Err(e) => {
                warn!(task_id = %self.id, error = %e, "Cancel failed");
                false
            }
        };

        self.attempt.lock().token.cancel();
        self.modifiers.cancel();
        self.recovery.cancel();
        self.context.scheduler.cancel(self.id);

        if transitioned {
            crate::logging::log_task_operation(
                "cancel",
                Some(&self.id.to_string()),
                Some(self.request.read().url.as_str()),
                "cancelled",
                report.then_some("reported"),
            );
        }
        transitioned
    }

    async fn run(self: Arc<Self>, generation: u64, token: CancellationToken) {
        let max_restarts = self.context.max_recovery_restarts();
        let mut attempt = 1u32;

        loop {
            match self.run_attempt(generation, &token, attempt).await {
                Step::Done => return,
                Step::Restart(error) => {
                    if attempt > max_restarts {
                        warn!(
                            task_id = %self.id,
                            restarts = attempt - 1,
                            "Recovery restarts exhausted"
                        );
                        self.complete(generation, Err(error));
                        return;
                    }
                    if !self.restart_in_place(generation) {
                        return;
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn run_attempt(&self, generation: u64, token: &CancellationToken, attempt: u32) -> Step {
        let flags = *self.flags.read();
        let mut request = self.request.read().clone();

        if !flags.ignore_cache && self.context.cache.is_enabled() {
            let decision = self.context.cache.lookup(&request).await;
            if !self.is_current(generation) {
                return Step::Done;
            }
            match decision {
                CacheDecision::Miss(reason) => {
                    debug!(task_id = %self.id, reason = ?reason, "Cache miss");
                    self.context.scheduler.cancel(self.id);
                }
                CacheDecision::Hit { entry, .. } if !flags.refresh => {
                    self.serve_cached(generation, &request, entry);
                    return Step::Done;
                }
                CacheDecision::Hit { reload_headers, .. }
                | CacheDecision::Expired { reload_headers, .. } => {
                    debug!(task_id = %self.id, "Revalidating cached entry");
                    request.merge_headers(&reload_headers);
                }
            }
        }

        let request = match self.modifiers.run(request, token).await {
            Ok(request) => request,
            Err(e) if e.is_cancelled() => return Step::Done,
            Err(e) => {
                warn!(task_id = %self.id, error = %e, "Request modifier failed");
                self.complete(generation, Err(e));
                return Step::Done;
            }
        };
        if !self.is_current(generation) {
            return Step::Done;
        }

        let interceptor = self.interceptor.read().clone();
        if let Some(interceptor) = interceptor {
            if let Some(outcome) = interceptor.intercept(&request).await {
                if !self.is_current(generation) {
                    return Step::Done;
                }
                debug!(task_id = %self.id, "Request intercepted");
                let outcome = synthesize_response(outcome, &request);
                return self
                    .classify(generation, token, request, outcome, flags, attempt, ResponseSource::Interceptor)
                    .await;
            }
        }

        if !self.enter_fetching(generation) {
            return Step::Done;
        }

        let fetcher = Arc::clone(&self.context.fetcher);
        let progress = self.progress_sink(generation);
        let timeout = request.timeout;
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return Step::Done,
            result = tokio::time::timeout(timeout, fetcher.fetch(request.clone(), progress)) => {
                result.unwrap_or_else(|_| FetchOutcome::failure(TransportError::TimedOut(timeout)))
            }
        };
        *self.last_connection_end.write() = Some(self.context.clock.now());

        if !self.is_current(generation) {
            return Step::Done;
        }
        self.classify(generation, token, request, outcome, flags, attempt, ResponseSource::Network)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn classify(
        &self,
        generation: u64,
        token: &CancellationToken,
        request: HttpRequest,
        outcome: FetchOutcome,
        flags: TaskFlags,
        attempt: u32,
        source: ResponseSource,
    ) -> Step {
        let FetchOutcome {
            body,
            response,
            error,
        } = outcome;

        let response = match (error, response) {
            (Some(error), response) => {
                return self
                    .recover(generation, token, request, error.into(), response, body, attempt)
                    .await
            }
            (None, None) => {
                return self
                    .recover(
                        generation,
                        token,
                        request,
                        ProtocolError::NonHttpResponse.into(),
                        None,
                        body,
                        attempt,
                    )
                    .await
            }
            (None, Some(response)) => response,
        };

        debug!(
            task_id = %self.id,
            status = %response.status,
            bytes = body.len(),
            source = ?source,
            "Response received"
        );

        if response.is_not_modified() {
            if let Some(entry) = self.context.cache.revalidated(&request, &response).await {
                if !self.is_current(generation) {
                    return Step::Done;
                }
                self.arm_refresh(&entry.headers);
                if flags.refresh {
                    self.finish_silently(generation);
                } else {
                    let metadata = entry.response_metadata(response.url.clone());
                    self.finish_decoding(generation, &entry.body, metadata, ResponseSource::Revalidated);
                }
                return Step::Done;
            }
        }

        if !response.is_success() {
            let mut error = NetworkError::Status {
                status: response.status,
            };
            let error_decoder = self.error_decoder.read().clone();
            if let Some(decoder) = error_decoder {
                error = decoder.decode_error(&body, Some(&response), error);
            }
            return self
                .recover(generation, token, request, error, Some(response), body, attempt)
                .await;
        }

        if let Err(e) = self.validators.validate(&response, &body) {
            warn!(task_id = %self.id, error = %e, "Response validation failed");
            self.complete(generation, Err(e));
            return Step::Done;
        }

        if source == ResponseSource::Network {
            let stored = self
                .context
                .cache
                .store_response(&request, &response, &body)
                .await;
            let decision = self.context.cache.evaluate_entry(stored.as_ref(), &request);
            match decision.entry() {
                Some(entry) => self.arm_refresh(&entry.headers),
                None => {
                    self.context.scheduler.cancel(self.id);
                }
            }
            if !self.is_current(generation) {
                return Step::Done;
            }
        }

        self.finish_decoding(generation, &body, response, source);
        Step::Done
    }

    #[allow(clippy::too_many_arguments)]
    async fn recover(
        &self,
        generation: u64,
        token: &CancellationToken,
        request: HttpRequest,
        error: NetworkError,
        response: Option<ResponseMetadata>,
        body: Bytes,
        attempt: u32,
    ) -> Step {
        if self.recovery.is_empty() {
            self.complete(generation, Err(error));
            return Step::Done;
        }

        let ctx = RecoveryContext {
            request,
            error: error.clone(),
            response,
            body,
            attempt,
            task: self.handle(),
        };

        let outcome = match self.recovery.run(&ctx, token).await {
            Ok(outcome) => outcome,
            Err(_) => return Step::Done,
        };
        if !self.is_current(generation) {
            return Step::Done;
        }

        match outcome {
            RecoveryOutcome::Restart => Step::Restart(error),
            RecoveryOutcome::Recovered { body, response } => {
                self.finish_decoding(generation, &body, response, ResponseSource::Recovery);
                Step::Done
            }
            RecoveryOutcome::Options(options) => {
                self.complete(
                    generation,
                    Err(NetworkError::Recoverable {
                        original: Box::new(error),
                        options,
                    }),
                );
                Step::Done
            }
            RecoveryOutcome::CannotRecover => {
                self.complete(generation, Err(error));
                Step::Done
            }
        }
    }

    fn serve_cached(&self, generation: u64, request: &HttpRequest, entry: CachedEntry) {
        debug!(task_id = %self.id, url = %request.url, "Serving cached response");
        self.arm_refresh(&entry.headers);
        self.context.cache.mark_used(request, &entry);
        let metadata = entry.response_metadata(request.url.clone());
        self.finish_decoding(generation, &entry.body, metadata, ResponseSource::Cache);
    }

    fn enter_fetching(&self, generation: u64) -> bool {
        let _guard = self.guard.lock();
        if !self.is_current(generation) {
            return false;
        }
        self.state.transition(TaskEvent::BeginFetch).is_ok()
    }

    /// `Fetching → Finished → WaitingExecution` without a completion
    fn restart_in_place(&self, generation: u64) -> bool {
        let _guard = self.guard.lock();
        if !self.is_current(generation) {
            return false;
        }
        let finished = self
            .state
            .transition_when(TaskEvent::Finish, |state| state.is_cancellable());
        if !matches!(finished, Ok(Some(_))) || self.state.transition(TaskEvent::Enqueue).is_err() {
            return false;
        }
        *self.progress.lock() = ProgressState {
            generation,
            value: 0.0,
        };
        info!(task_id = %self.id, generation = generation, "🔁 Task restarted by recovery");
        true
    }

    fn finish_decoding(
        &self,
        generation: u64,
        body: &Bytes,
        response: ResponseMetadata,
        source: ResponseSource,
    ) {
        let finished = {
            let _guard = self.guard.lock();
            self.decode_locked(generation, body, response, source)
        };
        if let Some(finished) = finished {
            self.deliver(generation, finished);
        }
    }

    fn decode_locked(
        &self,
        generation: u64,
        body: &Bytes,
        response: ResponseMetadata,
        source: ResponseSource,
    ) -> Option<Finished<T>> {
        if !self.is_current(generation) {
            return None;
        }
        self.state.transition(TaskEvent::BeginParse).ok()?;

        let decoder = self.decoder.read().clone();
        let result = decoder
            .decode(body, &response)
            .map(|value| TaskResponse {
                value: Arc::new(value),
                response: Some(response),
                source,
            })
            .map_err(NetworkError::from);

        self.finish_locked(result)
    }

    fn complete(&self, generation: u64, result: TaskResult<T>) {
        let finished = {
            let _guard = self.guard.lock();
            if !self.is_current(generation) {
                return;
            }
            self.finish_locked(result)
        };
        if let Some(finished) = finished {
            self.deliver(generation, finished);
        }
    }

    fn finish_silently(&self, generation: u64) {
        let _guard = self.guard.lock();
        if !self.is_current(generation) {
            return;
        }
        if let Ok(Some(_)) = self
            .state
            .transition_when(TaskEvent::Finish, |state| state.is_active())
        {
            debug!(task_id = %self.id, "Refresh confirmed cached entry, no completion");
        }
    }

    /// Move to Finished; the mutation guard must be held
    ///
    /// The waiters registered so far are detached here, so a `run()` issued after the
    /// guard is released waits for its own attempt. Hand the result to
    /// [`Self::deliver`] once the guard is released.
    fn finish_locked(&self, result: TaskResult<T>) -> Option<Finished<T>> {
        match self
            .state
            .transition_when(TaskEvent::Finish, |state| state.is_active())
        {
            Ok(Some(_)) => {}
            _ => return None,
        }

        match &result {
            Ok(response) => {
                info!(task_id = %self.id, source = ?response.source, "✅ Task finished");
            }
            Err(e) => {
                info!(task_id = %self.id, error = %e, "❌ Task finished with error");
            }
        }
        Some(Finished {
            result,
            waiters: self.observers.take_waiters(),
        })
    }

    /// Notify observers of a finished attempt; called without the mutation guard
    fn deliver(&self, generation: u64, finished: Finished<T>) {
        if finished.result.is_ok() {
            self.report_progress(generation, 1.0);
        }
        self.observers
            .notify_completion(&self.context.callbacks, finished.result, finished.waiters);
    }

    fn arm_refresh(&self, headers: &HeaderMap) {
        let target: Weak<dyn RefreshTarget> = self.weak_self.clone();
        let last_end = *self.last_connection_end.read();
        self.context
            .scheduler
            .schedule_from_headers(self.id, target, headers, last_end);
    }

    fn progress_sink(&self, generation: u64) -> ProgressSink {
        let task = self.weak_self.clone();
        ProgressSink::new(move |fraction| {
            if let Some(task) = task.upgrade() {
                task.report_progress(generation, fraction);
            }
        })
    }

    fn report_progress(&self, generation: u64, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        let mut progress = self.progress.lock();
        if progress.generation != generation || fraction <= progress.value {
            return;
        }
        progress.value = fraction;
        self.observers
            .notify_progress(&self.context.callbacks, fraction);
    }
}

/// Interceptor outcomes may omit the response head
fn synthesize_response(mut outcome: FetchOutcome, request: &HttpRequest) -> FetchOutcome {
    if outcome.error.is_none() && outcome.response.is_none() {
        outcome.response = Some(ResponseMetadata::new(
            StatusCode::OK,
            HeaderMap::new(),
            request.url.clone(),
        ));
    }
    outcome
}

impl<T: Send + Sync + 'static> TaskControl for TaskInner<T> {
    fn restart(&self) -> bool {
        match self.weak_self.upgrade() {
            Some(this) => {
                let flags = this.flags.read().for_user_start();
                this.start_with(flags, None)
            }
            None => false,
        }
    }

    fn cancel(&self) {
        TaskInner::cancel(self, false);
    }

    fn state(&self) -> TaskState {
        self.state.current_state()
    }
}

impl<T: Send + Sync + 'static> RefreshTarget for TaskInner<T> {
    fn refresh_fired(&self) {
        if let Some(this) = self.weak_self.upgrade() {
            info!(task_id = %self.id, "🔄 Auto-refresh fired");
            this.start_refresh();
        }
    }
}

/// A request owned by the caller, with its pipelines and observers
///
/// Dropping the task cancels in-flight work and removes its refresh timer.
pub struct NetworkTask<T: Send + Sync + 'static> {
    inner: Arc<TaskInner<T>>,
}

impl<T: Send + Sync + 'static> fmt::Debug for NetworkTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (completion, progress) = self.inner.observers.counts();
        f.debug_struct("NetworkTask")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("url", &self.inner.request.read().url)
            .field("flags", &*self.inner.flags.read())
            .field("modifiers", &self.inner.modifiers)
            .field("validators", &self.inner.validators)
            .field("recovery", &self.inner.recovery)
            .field("completion_observers", &completion)
            .field("progress_observers", &progress)
            .finish()
    }
}

impl<T: Send + Sync + 'static> NetworkTask<T> {
    pub fn new(
        request: HttpRequest,
        context: NetworkContext,
        decoder: impl Decoder<T> + 'static,
    ) -> Self {
        Self::with_decoder(request, context, Arc::new(decoder))
    }

    pub fn with_decoder(
        request: HttpRequest,
        context: NetworkContext,
        decoder: Arc<dyn Decoder<T>>,
    ) -> Self {
        let inner = TaskInner::new(request, context, decoder);
        debug!(task_id = %inner.id, url = %inner.request.read().url, "Task created");
        Self { inner }
    }

    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    pub fn state(&self) -> TaskState {
        self.inner.state.current_state()
    }

    pub fn request(&self) -> HttpRequest {
        self.inner.request.read().clone()
    }

    /// Replace the request used by the next attempt
    pub fn set_request(&self, request: HttpRequest) {
        *self.inner.request.write() = request;
    }

    pub fn priority(&self) -> TaskPriority {
        self.inner.request.read().priority
    }

    pub fn flags(&self) -> TaskFlags {
        *self.inner.flags.read()
    }

    pub fn set_ignore_cache(&self, ignore_cache: bool) {
        self.inner.flags.write().ignore_cache = ignore_cache;
    }

    /// Progress of the current attempt in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.inner.progress.lock().value
    }

    pub fn handle(&self) -> TaskHandle {
        self.inner.handle()
    }

    pub fn context(&self) -> &NetworkContext {
        &self.inner.context
    }

    pub fn add_modifier(&self, modifier: Arc<dyn RequestModifier>) {
        self.inner.modifiers.add(modifier);
    }

    pub fn add_validator(&self, validator: Arc<dyn ResponseValidator>) {
        self.inner.validators.add(validator);
    }

    pub fn add_recovery_strategy(&self, strategy: Arc<dyn RecoveryStrategy>) {
        self.inner.recovery.add(strategy);
    }

    pub fn set_interceptor(&self, interceptor: Option<Arc<dyn RequestInterceptor>>) {
        *self.inner.interceptor.write() = interceptor;
    }

    pub fn set_decoder(&self, decoder: Arc<dyn Decoder<T>>) {
        *self.inner.decoder.write() = decoder;
    }

    pub fn set_error_decoder(&self, decoder: Arc<dyn ErrorBodyDecoder>) {
        *self.inner.error_decoder.write() = Some(decoder);
    }

    pub fn on_completion(&self, observer: impl Fn(&TaskResult<T>) + Send + Sync + 'static) {
        self.inner.observers.add_completion(Arc::new(observer));
    }

    pub fn on_progress(&self, observer: impl Fn(f64) + Send + Sync + 'static) {
        self.inner.observers.add_progress(Arc::new(observer));
    }

    pub fn on_state_change(&self, observer: impl Fn(TaskState, TaskState) + Send + Sync + 'static) {
        self.inner.state.add_observer(Arc::new(observer));
    }

    /// Start a new attempt, superseding any attempt in flight
    pub fn start(&self) -> bool {
        let flags = self.inner.flags.read().for_user_start();
        self.inner.start_with(flags, None)
    }

    pub fn restart(&self) -> bool {
        self.start()
    }

    /// Cancel the attempt in flight without a completion
    pub fn cancel(&self) -> bool {
        self.inner.cancel(false)
    }

    /// Cancel the attempt in flight and complete it with [`NetworkError::Cancelled`]
    pub fn cancel_and_report(&self) -> bool {
        self.inner.cancel(true)
    }

    /// Resolves with the next completion of this task
    pub fn completion(&self) -> impl Future<Output = TaskResult<T>> + Send + 'static {
        let (sender, receiver) = oneshot::channel();
        self.inner
            .observers
            .add_waiter(CompletionWaiter::Async(sender));
        async move { receiver.await.unwrap_or(Err(NetworkError::Cancelled)) }
    }

    /// Start and wait for the completion of this attempt
    pub async fn run(&self) -> TaskResult<T> {
        let (sender, receiver) = oneshot::channel();
        let flags = self.inner.flags.read().for_user_start();
        if !self
            .inner
            .start_with(flags, Some(CompletionWaiter::Async(sender)))
        {
            return Err(NetworkError::Internal("task could not be started".to_string()));
        }
        receiver.await.unwrap_or(Err(NetworkError::Cancelled))
    }

    /// Start and block the calling thread until completion
    ///
    /// Gives up after the request timeout times the configured multiplier. Must not be
    /// called from a runtime worker thread.
    pub fn start_blocking(&self) -> TaskResult<T> {
        let (sender, receiver) = crossbeam::channel::bounded(1);
        let wait = self
            .inner
            .context
            .synchronous_wait(self.inner.request.read().timeout);
        let flags = TaskFlags {
            synchronous: true,
            ..self.inner.flags.read().for_user_start()
        };

        if !self
            .inner
            .start_with(flags, Some(CompletionWaiter::Blocking(sender)))
        {
            return Err(NetworkError::Internal("task could not be started".to_string()));
        }

        match receiver.recv_timeout(wait) {
            Ok(result) => result,
            Err(_) => {
                warn!(task_id = %self.inner.id, waited_ms = wait.as_millis() as u64, "Synchronous start timed out");
                self.inner.cancel(false);
                Err(TransportError::SynchronousTimeout { waited: wait }.into())
            }
        }
    }

    /// Run the decoder over a body outside the normal flow
    pub fn decode(&self, body: &Bytes, response: &ResponseMetadata) -> NetworkResult<T> {
        let decoder = self.inner.decoder.read().clone();
        decoder.decode(body, response).map_err(NetworkError::from)
    }
}

impl<T: Send + Sync + 'static> Drop for NetworkTask<T> {
    fn drop(&mut self) {
        self.inner.cancel(false);
        self.inner.context.scheduler.deregister(self.inner.id);
        self.inner.observers.abandon_waiters();
        debug!(task_id = %self.inner.id, "Task dropped");
    }
}
