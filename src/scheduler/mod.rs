//! # Auto-Refresh Scheduler
//!
//! One-shot timers that re-run a task shortly before its cached response goes stale.
//! The registry is keyed by task identity and only holds weak references to tasks.

pub mod refresh;

pub use refresh::{compute_next_refresh, AutoRefreshScheduler, RefreshTarget};
