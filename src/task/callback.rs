//! Execution contexts for observer callbacks.

use crossbeam::channel::{self, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
enum QueueKind {
    Inline,
    Serial { sender: Sender<Job>, name: Arc<str> },
}

/// Where observer callbacks run
///
/// A serial queue runs callbacks one at a time, in submission order, on a dedicated
/// thread. Clones share the same thread; it exits once every clone is dropped.
#[derive(Clone)]
pub struct CallbackQueue {
    kind: QueueKind,
}

impl std::fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            QueueKind::Inline => f.write_str("CallbackQueue::Inline"),
            QueueKind::Serial { name, sender } => f
                .debug_struct("CallbackQueue::Serial")
                .field("name", name)
                .field("pending", &sender.len())
                .finish(),
        }
    }
}

impl CallbackQueue {
    /// Run callbacks synchronously on the thread that triggers them
    ///
    /// State and progress notifications are dispatched while the task's state or
    /// progress lock is held, so inline state and progress observers must not call back
    /// into the same task. Completion observers run after the task's locks are released
    /// and may restart it.
    pub fn inline() -> Self {
        Self {
            kind: QueueKind::Inline,
        }
    }

    /// Spawn a dedicated thread that runs callbacks in order
    pub fn serial(name: impl Into<String>) -> Self {
        let name: String = name.into();
        let (sender, receiver) = channel::unbounded::<Job>();
        let thread_name = name.clone();

        let spawned = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                for job in receiver {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!(queue = %thread_name, "Observer callback panicked");
                    }
                }
                debug!(queue = %thread_name, "Callback queue drained and closed");
            });

        match spawned {
            Ok(_) => Self {
                kind: QueueKind::Serial {
                    sender,
                    name: name.into(),
                },
            },
            Err(e) => {
                warn!(queue = %name, error = %e, "Failed to spawn callback thread, running inline");
                Self::inline()
            }
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.kind, QueueKind::Inline)
    }

    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        match &self.kind {
            QueueKind::Inline => job(),
            QueueKind::Serial { sender, name } => {
                if sender.send(Box::new(job)).is_err() {
                    warn!(queue = %name, "Callback queue closed, dropping callback");
                }
            }
        }
    }
}

impl Default for CallbackQueue {
    fn default() -> Self {
        Self::serial("netask-callbacks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[test]
    fn test_inline_runs_immediately() {
        let queue = CallbackQueue::inline();
        let hit = Arc::new(Mutex::new(false));
        let flag = hit.clone();
        queue.dispatch(move || *flag.lock() = true);
        assert!(*hit.lock());
    }

    #[test]
    fn test_serial_preserves_order_and_survives_panics() {
        let queue = CallbackQueue::serial("test-callbacks");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = channel::bounded(1);

        for i in 0..5 {
            let seen = seen.clone();
            queue.dispatch(move || seen.lock().push(i));
        }
        queue.dispatch(|| panic!("observer bug"));
        queue.dispatch(move || {
            let _ = done_tx.send(());
        });

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }
}
