//! # Network Tasks
//!
//! The orchestrator that owns a request and drives it through the cache, the pipelines
//! and the fetch collaborator, plus the collaborator interfaces it depends on.

pub mod callback;
pub mod context;
pub mod fetch;
pub mod flags;
pub mod handle;
pub mod interceptor;
pub mod network_task;
pub mod observers;

pub use callback::CallbackQueue;
pub use context::{NetworkContext, NetworkContextBuilder};
pub use fetch::{FetchOutcome, Fetcher, ProgressSink};
pub use flags::TaskFlags;
pub use handle::TaskHandle;
pub use interceptor::RequestInterceptor;
pub use network_task::{NetworkTask, ResponseSource, TaskId, TaskResponse, TaskResult};
pub use observers::{CompletionObserver, ProgressObserver};
