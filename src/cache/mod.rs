//! # Response Cache
//!
//! HTTP cache semantics for task responses.
//!
//! ## Architecture
//!
//! ```text
//! ResponseCache                 <- store side effects, clock
//!   ├── CachePolicy             <- pure Miss/Expired/Hit evaluator + DecisionHook
//!   └── Arc<dyn CacheStore>
//!         ├── MemoryCacheStore  <- DashMap, process lifetime
//!         └── NoOpCacheStore    <- always miss
//! ```
//!
//! Embedders with a persistent store implement [`CacheStore`] themselves.

pub mod control;
pub mod entry;
pub mod language;
pub mod manager;
pub mod policy;
pub mod providers;
pub mod store;

pub use control::CacheControl;
pub use entry::{CachedEntry, EntryMetadata, StoragePolicy};
pub use manager::ResponseCache;
pub use policy::{
    CacheDecision, CacheForeverHook, CachePolicy, DateOnlyFallback, DecisionContext,
    DecisionHook, DecisionStage, DefaultHook, MissReason, StaleExtensionHook,
};
pub use providers::{MemoryCacheStore, NoOpCacheStore};
pub use store::CacheStore;
