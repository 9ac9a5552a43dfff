//! Last-writer-wins invocation tokens for re-runnable pipelines.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Holds the token of the most recent invocation of a pipeline
///
/// Beginning a new invocation cancels the previous one. Tokens are children of the
/// caller's token, so cancelling the task cancels the pipeline too.
#[derive(Debug, Default)]
pub struct InvocationSlot {
    current: Mutex<Option<CancellationToken>>,
}

impl InvocationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new invocation, superseding the previous one
    pub fn begin(&self, parent: &CancellationToken) -> CancellationToken {
        let token = parent.child_token();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the current invocation, if any
    pub fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}
