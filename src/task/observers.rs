//! Completion and progress observer registries for a task.

use super::callback::CallbackQueue;
use super::network_task::TaskResult;
use crate::error::NetworkError;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::oneshot;

pub type CompletionObserver<T> = Arc<dyn Fn(&TaskResult<T>) + Send + Sync>;
pub type ProgressObserver = Arc<dyn Fn(f64) + Send + Sync>;

/// One-shot listener for the next completion
pub(crate) enum CompletionWaiter<T> {
    Async(oneshot::Sender<TaskResult<T>>),
    Blocking(crossbeam::channel::Sender<TaskResult<T>>),
}

impl<T> CompletionWaiter<T> {
    fn deliver(self, result: TaskResult<T>) {
        // Receivers that went away are fine to ignore
        match self {
            Self::Async(sender) => {
                let _ = sender.send(result);
            }
            Self::Blocking(sender) => {
                let _ = sender.try_send(result);
            }
        }
    }
}

pub(crate) struct TaskObservers<T> {
    completion: RwLock<Vec<CompletionObserver<T>>>,
    progress: RwLock<Vec<ProgressObserver>>,
    waiters: Mutex<Vec<CompletionWaiter<T>>>,
}

impl<T> Default for TaskObservers<T> {
    fn default() -> Self {
        Self {
            completion: RwLock::new(Vec::new()),
            progress: RwLock::new(Vec::new()),
            waiters: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Send + Sync + 'static> TaskObservers<T> {
    pub fn add_completion(&self, observer: CompletionObserver<T>) {
        self.completion.write().push(observer);
    }

    pub fn add_progress(&self, observer: ProgressObserver) {
        self.progress.write().push(observer);
    }

    pub fn add_waiter(&self, waiter: CompletionWaiter<T>) {
        self.waiters.lock().push(waiter);
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.completion.read().len(), self.progress.read().len())
    }

    /// Detach the waiters owed the current completion
    pub fn take_waiters(&self) -> Vec<CompletionWaiter<T>> {
        std::mem::take(&mut *self.waiters.lock())
    }

    pub fn notify_completion(
        &self,
        callbacks: &CallbackQueue,
        result: TaskResult<T>,
        waiters: Vec<CompletionWaiter<T>>,
    ) {
        let observers = self.completion.read().clone();
        callbacks.dispatch(move || {
            for observer in &observers {
                observer(&result);
            }
            for waiter in waiters {
                waiter.deliver(result.clone());
            }
        });
    }

    pub fn notify_progress(&self, callbacks: &CallbackQueue, fraction: f64) {
        let observers = self.progress.read().clone();
        if observers.is_empty() {
            return;
        }
        callbacks.dispatch(move || {
            for observer in &observers {
                observer(fraction);
            }
        });
    }

    /// Fail every pending waiter, used when the task goes away
    pub fn abandon_waiters(&self) {
        for waiter in self.take_waiters() {
            waiter.deliver(Err(NetworkError::Cancelled));
        }
    }
}
