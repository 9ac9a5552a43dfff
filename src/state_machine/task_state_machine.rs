use super::{
    errors::{StateMachineError, StateMachineResult},
    events::TaskEvent,
    states::TaskState,
};
use crate::task::callback::CallbackQueue;
use crate::task::TaskId;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error};

/// Observer of `(old, new)` state pairs
pub type StateObserver = Arc<dyn Fn(TaskState, TaskState) + Send + Sync>;

/// Thread-safe state cell for a single network task
///
/// The state and its observers live behind separate locks. Observer notifications are
/// enqueued on the task's [`CallbackQueue`] while the state lock is still held, so a
/// serial queue delivers pairs in exactly the order the transitions happened.
pub struct TaskStateMachine {
    task_id: TaskId,
    state: RwLock<TaskState>,
    observers: RwLock<Vec<StateObserver>>,
    callbacks: CallbackQueue,
}

impl std::fmt::Debug for TaskStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStateMachine")
            .field("task_id", &self.task_id)
            .field("state", &*self.state.read())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

impl TaskStateMachine {
    pub fn new(task_id: TaskId, callbacks: CallbackQueue) -> Self {
        Self {
            task_id,
            state: RwLock::new(TaskState::default()),
            observers: RwLock::new(Vec::new()),
            callbacks,
        }
    }

    pub fn current_state(&self) -> TaskState {
        *self.state.read()
    }

    pub fn add_observer(&self, observer: StateObserver) {
        self.observers.write().push(observer);
    }

    /// Apply `event`, failing with [`StateMachineError::InvalidTransition`] when the table
    /// forbids it. Illegal transitions are reported as internal faults.
    pub fn transition(&self, event: TaskEvent) -> StateMachineResult<TaskState> {
        match self.transition_when(event, |_| true)? {
            Some((_, to)) => Ok(to),
            None => Err(StateMachineError::Internal(
                "unconditional transition was skipped".to_string(),
            )),
        }
    }

    /// Apply `event` only if `predicate` accepts the current state.
    ///
    /// Returns `Ok(None)` when the predicate declined, `Ok(Some((from, to)))` when the
    /// transition happened. The check and the write happen under one lock.
    pub fn transition_when(
        &self,
        event: TaskEvent,
        predicate: impl FnOnce(TaskState) -> bool,
    ) -> StateMachineResult<Option<(TaskState, TaskState)>> {
        let mut state = self.state.write();
        let from = *state;
        if !predicate(from) {
            return Ok(None);
        }

        let to = self.determine_target_state(from, event)?;
        *state = to;

        debug!(
            task_id = %self.task_id,
            from = %from,
            to = %to,
            event = event.event_type(),
            "Task state transition"
        );

        self.notify(from, to);
        Ok(Some((from, to)))
    }

    fn determine_target_state(
        &self,
        from: TaskState,
        event: TaskEvent,
    ) -> StateMachineResult<TaskState> {
        let to = event.target_state();
        if from.can_transition_to(to) {
            return Ok(to);
        }

        let err = StateMachineError::InvalidTransition {
            from,
            to,
            event: event.event_type(),
        };
        self.report_fault(&err);
        Err(err)
    }

    fn notify(&self, from: TaskState, to: TaskState) {
        let observers = self.observers.read().clone();
        if observers.is_empty() {
            return;
        }
        self.callbacks.dispatch(move || {
            for observer in &observers {
                observer(from, to);
            }
        });
    }

    fn report_fault(&self, err: &StateMachineError) {
        error!(
            task_id = %self.task_id,
            error = %err,
            "🚨 INTERNAL FAULT: illegal task state transition"
        );
        if cfg!(test) {
            panic!("illegal task state transition: {err}");
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }
}
