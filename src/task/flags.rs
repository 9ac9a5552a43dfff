use serde::{Deserialize, Serialize};

/// Per-attempt behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFlags {
    /// Skip the cache lookup; the response is still stored
    pub ignore_cache: bool,
    /// Started by the library rather than the caller
    pub system_triggered: bool,
    /// Started through `start_blocking`
    pub synchronous: bool,
    /// Started by the auto-refresh scheduler
    pub refresh: bool,
}

impl TaskFlags {
    pub fn refresh() -> Self {
        Self {
            system_triggered: true,
            refresh: true,
            ..Self::default()
        }
    }

    /// Caller-owned flags carried over into a new attempt
    pub fn for_user_start(self) -> Self {
        Self {
            ignore_cache: self.ignore_cache,
            ..Self::default()
        }
    }
}
