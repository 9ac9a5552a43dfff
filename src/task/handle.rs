//! Weak, type-erased handles to a running task.

use super::TaskId;
use crate::state_machine::TaskState;
use std::sync::{Arc, Weak};

/// Operations available through a [`TaskHandle`]
pub(crate) trait TaskControl: Send + Sync {
    fn restart(&self) -> bool;
    fn cancel(&self);
    fn state(&self) -> TaskState;
}

/// Non-owning reference to a task, usable from strategies and recovery options
#[derive(Clone)]
pub struct TaskHandle {
    task_id: TaskId,
    inner: Weak<dyn TaskControl>,
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task_id", &self.task_id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

struct Detached;

impl TaskControl for Detached {
    fn restart(&self) -> bool {
        false
    }

    fn cancel(&self) {}

    fn state(&self) -> TaskState {
        TaskState::Initial
    }
}

impl TaskHandle {
    pub(crate) fn new(task_id: TaskId, inner: Weak<dyn TaskControl>) -> Self {
        Self { task_id, inner }
    }

    /// Handle that refers to no live task
    pub fn detached(task_id: TaskId) -> Self {
        let inner: Weak<dyn TaskControl> = Weak::<Detached>::new();
        Self { task_id, inner }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Start the task again; `false` if it no longer exists
    pub fn restart(&self) -> bool {
        self.upgrade().is_some_and(|task| task.restart())
    }

    pub fn cancel(&self) {
        if let Some(task) = self.upgrade() {
            task.cancel();
        }
    }

    pub fn state(&self) -> Option<TaskState> {
        self.upgrade().map(|task| task.state())
    }

    fn upgrade(&self) -> Option<Arc<dyn TaskControl>> {
        self.inner.upgrade()
    }
}
