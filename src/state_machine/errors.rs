use super::states::TaskState;
use thiserror::Error;

/// Error types for state machine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition from {from} to {to} on {event}")]
    InvalidTransition {
        from: TaskState,
        to: TaskState,
        event: &'static str,
    },

    #[error("Attempt {attempt} was superseded")]
    Superseded { attempt: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StateMachineError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Helper function to create internal errors
pub fn internal_error(msg: impl Into<String>) -> StateMachineError {
    StateMachineError::Internal(msg.into())
}
