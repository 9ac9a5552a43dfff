//! Recovery strategies consulted, in order, after a failed attempt.

use super::invocation::InvocationSlot;
use crate::error::{NetworkError, NetworkResult};
use crate::http::{HttpRequest, ResponseMetadata};
use crate::task::TaskHandle;
use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Everything a strategy knows about the failure
#[derive(Debug, Clone)]
pub struct RecoveryContext {
    pub request: HttpRequest,
    pub error: NetworkError,
    pub response: Option<ResponseMetadata>,
    pub body: Bytes,
    /// 1-based number of the attempt that failed
    pub attempt: u32,
    pub task: TaskHandle,
}

#[derive(Debug, Clone)]
pub enum RecoveryOutcome {
    /// Run the task again from scratch
    Restart,
    /// Use this data as if the fetch had produced it
    Recovered { body: Bytes, response: ResponseMetadata },
    /// Let the user pick; the task completes with a recoverable error
    Options(Vec<RecoveryOption>),
    CannotRecover,
}

impl RecoveryOutcome {
    pub fn is_recovered(&self) -> bool {
        !matches!(self, Self::CannotRecover)
    }
}

/// Work performed when the user picks a recovery option
#[async_trait]
pub trait RecoveryAction: Send + Sync {
    async fn run(&self, token: &CancellationToken) -> NetworkResult<()>;
}

/// A user-facing recovery choice, invokable and cancelable independently of its siblings
#[derive(Clone)]
pub struct RecoveryOption {
    title: String,
    action: Arc<dyn RecoveryAction>,
    token: CancellationToken,
}

impl std::fmt::Debug for RecoveryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryOption")
            .field("title", &self.title)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl RecoveryOption {
    pub fn new(title: impl Into<String>, action: Arc<dyn RecoveryAction>) -> Self {
        Self {
            title: title.into(),
            action,
            token: CancellationToken::new(),
        }
    }

    /// Option that restarts the task behind `handle`
    pub fn retry(title: impl Into<String>, handle: TaskHandle) -> Self {
        Self::new(title, Arc::new(RestartTaskAction { handle }))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub async fn invoke(&self) -> NetworkResult<()> {
        if self.token.is_cancelled() {
            return Err(NetworkError::Cancelled);
        }
        info!(option = %self.title, "Recovery option invoked");
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(NetworkError::Cancelled),
            result = self.action.run(&self.token) => result,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct RestartTaskAction {
    handle: TaskHandle,
}

#[async_trait]
impl RecoveryAction for RestartTaskAction {
    async fn run(&self, _token: &CancellationToken) -> NetworkResult<()> {
        if self.handle.restart() {
            Ok(())
        } else {
            Err(NetworkError::Internal(format!(
                "task {} no longer exists",
                self.handle.task_id()
            )))
        }
    }
}

#[async_trait]
pub trait RecoveryStrategy: Send + Sync {
    async fn recover(&self, ctx: &RecoveryContext, token: &CancellationToken) -> RecoveryOutcome;

    /// Opt in to being consulted for non-success HTTP statuses
    fn handles_status_errors(&self) -> bool {
        false
    }

    fn name(&self) -> &str;
}

/// Ordered chain of [`RecoveryStrategy`]s; the first outcome other than
/// `CannotRecover` wins
#[derive(Default)]
pub struct RecoveryPipeline {
    strategies: RwLock<Vec<Arc<dyn RecoveryStrategy>>>,
    slot: InvocationSlot,
}

impl std::fmt::Debug for RecoveryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .strategies
            .read()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        f.debug_struct("RecoveryPipeline")
            .field("strategies", &names)
            .finish()
    }
}

impl RecoveryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, strategy: Arc<dyn RecoveryStrategy>) {
        self.strategies.write().push(strategy);
    }

    pub fn clear(&self) {
        self.strategies.write().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.strategies.read().len()
    }

    /// Consult strategies in order
    ///
    /// Status errors only reach strategies that opted in. Returns `Cancelled` if this
    /// invocation was superseded or the task was cancelled.
    pub async fn run(
        &self,
        ctx: &RecoveryContext,
        parent: &CancellationToken,
    ) -> NetworkResult<RecoveryOutcome> {
        let token = self.slot.begin(parent);
        let strategies = self.strategies.read().clone();
        let status_error = ctx.error.root().is_status();

        for strategy in strategies {
            if token.is_cancelled() {
                return Err(NetworkError::Cancelled);
            }
            if status_error && !strategy.handles_status_errors() {
                continue;
            }

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(NetworkError::Cancelled),
                outcome = strategy.recover(ctx, &token) => outcome,
            };

            if outcome.is_recovered() {
                info!(
                    task_id = %ctx.task.task_id(),
                    strategy = strategy.name(),
                    attempt = ctx.attempt,
                    "🔧 Recovery strategy engaged"
                );
                return Ok(outcome);
            }
            debug!(strategy = strategy.name(), "Recovery strategy declined");
        }

        Ok(RecoveryOutcome::CannotRecover)
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

/// Which failures [`RetryStrategy`] restarts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOn {
    TransientTransport,
    AnyTransport,
    Statuses(Vec<StatusCode>),
}

/// Restarts the task up to `max_attempts` attempts in total
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    pub max_attempts: u32,
    pub retry_on: RetryOn,
}

impl RetryStrategy {
    pub fn transient(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retry_on: RetryOn::TransientTransport,
        }
    }

    pub fn on_statuses(max_attempts: u32, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            max_attempts,
            retry_on: RetryOn::Statuses(statuses.into_iter().collect()),
        }
    }

    fn matches(&self, error: &NetworkError) -> bool {
        match (&self.retry_on, error.root()) {
            (RetryOn::TransientTransport, NetworkError::Transport(e)) => e.is_transient(),
            (RetryOn::AnyTransport, NetworkError::Transport(_)) => true,
            (RetryOn::Statuses(statuses), NetworkError::Status { status }) => {
                statuses.contains(status)
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RecoveryStrategy for RetryStrategy {
    async fn recover(&self, ctx: &RecoveryContext, _token: &CancellationToken) -> RecoveryOutcome {
        if ctx.attempt < self.max_attempts && self.matches(&ctx.error) {
            RecoveryOutcome::Restart
        } else {
            RecoveryOutcome::CannotRecover
        }
    }

    fn handles_status_errors(&self) -> bool {
        matches!(self.retry_on, RetryOn::Statuses(_))
    }

    fn name(&self) -> &str {
        "retry"
    }
}

/// Offers the user a single "retry" option instead of retrying automatically
#[derive(Debug, Clone)]
pub struct RetryPromptStrategy {
    pub title: String,
}

#[async_trait]
impl RecoveryStrategy for RetryPromptStrategy {
    async fn recover(&self, ctx: &RecoveryContext, _token: &CancellationToken) -> RecoveryOutcome {
        if !matches!(ctx.error.root(), NetworkError::Transport(_)) {
            return RecoveryOutcome::CannotRecover;
        }
        RecoveryOutcome::Options(vec![RecoveryOption::retry(
            self.title.clone(),
            ctx.task.clone(),
        )])
    }

    fn name(&self) -> &str {
        "retry_prompt"
    }
}
