use super::states::TaskState;
use serde::{Deserialize, Serialize};

/// Events that drive task state transitions
///
/// Each event names exactly one target state; whether the move is allowed is decided by
/// [`TaskState::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// Queue an attempt (start or restart)
    Enqueue,
    /// Hand the request to the fetch collaborator
    BeginFetch,
    /// Start decoding a body
    BeginParse,
    /// Attempt completed
    Finish,
    /// Attempt cancelled
    Cancel,
}

impl TaskEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Enqueue => "enqueue",
            Self::BeginFetch => "begin_fetch",
            Self::BeginParse => "begin_parse",
            Self::Finish => "finish",
            Self::Cancel => "cancel",
        }
    }

    pub fn target_state(&self) -> TaskState {
        match self {
            Self::Enqueue => TaskState::WaitingExecution,
            Self::BeginFetch => TaskState::Fetching,
            Self::BeginParse => TaskState::Parsing,
            Self::Finish => TaskState::Finished,
            Self::Cancel => TaskState::Cancelled,
        }
    }

    /// Check if this event represents a terminal transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish | Self::Cancel)
    }
}
