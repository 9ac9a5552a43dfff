#![allow(clippy::doc_markdown)] // Allow technical terms like ETag, Cache-Control in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Netask Core
//!
//! Client-side HTTP task orchestration.
//!
//! ## Overview
//!
//! A [`NetworkTask`] drives a single request through cache lookup, request modifiers,
//! the fetch collaborator, response validation, caching, decoding and error recovery,
//! and reports exactly one completion per attempt. The crate never opens a socket: the
//! byte transport is supplied through the [`Fetcher`] trait, and persistent storage
//! through [`cache::CacheStore`].
//!
//! ## Architecture
//!
//! ```text
//! NetworkTask ──► ResponseCache (CachePolicy + CacheStore)
//!      │     ──► ModifierPipeline ──► Fetcher ──► ValidatorChain ──► Decoder
//!      │     ──► RecoveryPipeline (restart, recovered body, user options)
//!      └────────► AutoRefreshScheduler (Expires / Refresh-Interval timers)
//! ```
//!
//! ## Module Organization
//!
//! - [`cache`] - Cache policy evaluation, stored entries and storage providers
//! - [`scheduler`] - Auto-refresh timers keyed by task
//! - [`pipeline`] - Modifiers, validators, decoders and recovery strategies
//! - [`task`] - The network task, its context and observer plumbing
//! - [`state_machine`] - Task lifecycle states and legal transitions
//! - [`http`] - Request/response vocabulary and header aliases
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netask_core::http::HttpRequest;
//! use netask_core::pipeline::JsonDecoder;
//! use netask_core::task::{Fetcher, NetworkContext, NetworkTask};
//! use std::sync::Arc;
//!
//! # async fn example(fetcher: Arc<dyn Fetcher>) -> Result<(), Box<dyn std::error::Error>> {
//! let context = NetworkContext::builder(fetcher).build()?;
//! let request = context.get("https://api.example.com/profile");
//!
//! let task = NetworkTask::new(request, context, JsonDecoder::<serde_json::Value>::new());
//! let response = task.run().await?;
//! println!("{} from {:?}", response.value, response.source);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod scheduler;
pub mod state_machine;
pub mod task;

pub use cache::{CacheDecision, CachePolicy, CachedEntry, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigManager, NetaskConfig};
pub use error::{NetworkError, NetworkResult};
pub use http::{HeaderAliases, HttpRequest, ResponseMetadata};
pub use scheduler::AutoRefreshScheduler;
pub use state_machine::{TaskEvent, TaskState};
pub use task::{
    CallbackQueue, FetchOutcome, Fetcher, NetworkContext, NetworkTask, ResponseSource, TaskId,
    TaskResponse, TaskResult,
};
