use serde::{Deserialize, Serialize};
use std::fmt;

/// Network task lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task constructed, never started
    #[default]
    Initial,
    /// Started; running modifiers, cache lookup or waiting for the fetch slot
    WaitingExecution,
    /// Request handed to the fetch collaborator
    Fetching,
    /// Decoding a response body
    Parsing,
    /// Completed (successfully or not)
    Finished,
    /// Cancelled by the caller or superseded by a restart
    Cancelled,
}

impl TaskState {
    pub const ALL: [TaskState; 6] = [
        Self::Initial,
        Self::WaitingExecution,
        Self::Fetching,
        Self::Parsing,
        Self::Finished,
        Self::Cancelled,
    ];

    /// The transition table. Anything not listed here is an internal fault.
    pub fn can_transition_to(&self, to: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, to),
            (Initial, WaitingExecution)
                | (WaitingExecution, Fetching)
                | (WaitingExecution, Cancelled)
                | (WaitingExecution, Parsing)
                | (WaitingExecution, Finished)
                | (Fetching, Parsing)
                | (Fetching, Finished)
                | (Fetching, Cancelled)
                | (Parsing, Finished)
                | (Finished, WaitingExecution)
                | (Cancelled, WaitingExecution)
                | (Cancelled, Cancelled)
        )
    }

    /// Check if this state has in-flight work that `cancel()` may interrupt
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::WaitingExecution | Self::Fetching)
    }

    /// Check if `start()` may move this state straight to `WaitingExecution`
    pub fn is_restartable(&self) -> bool {
        matches!(self, Self::Initial | Self::Finished | Self::Cancelled)
    }

    /// Check if the task is doing work
    pub fn is_active(&self) -> bool {
        matches!(self, Self::WaitingExecution | Self::Fetching | Self::Parsing)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::WaitingExecution => write!(f, "waiting_execution"),
            Self::Fetching => write!(f, "fetching"),
            Self::Parsing => write!(f, "parsing"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "waiting_execution" => Ok(Self::WaitingExecution),
            "fetching" => Ok(Self::Fetching),
            "parsing" => Ok(Self::Parsing),
            "finished" => Ok(Self::Finished),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid task state: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use TaskState::*;
        assert!(Initial.can_transition_to(WaitingExecution));
        assert!(WaitingExecution.can_transition_to(Parsing));
        assert!(Fetching.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(Finished.can_transition_to(WaitingExecution));

        assert!(!Initial.can_transition_to(Fetching));
        assert!(!Parsing.can_transition_to(Cancelled));
        assert!(!Finished.can_transition_to(Cancelled));
        assert!(!Finished.can_transition_to(Finished));
        assert!(!Fetching.can_transition_to(WaitingExecution));
    }

    #[test]
    fn test_legal_transition_count() {
        let legal = TaskState::ALL
            .iter()
            .flat_map(|from| TaskState::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .count();
        assert_eq!(legal, 12);
    }

    #[test]
    fn test_restart_states() {
        assert!(TaskState::Finished.is_restartable());
        assert!(TaskState::Cancelled.is_restartable());
        assert!(!TaskState::Fetching.is_restartable());
        for state in TaskState::ALL {
            if state.is_restartable() {
                assert!(state.can_transition_to(TaskState::WaitingExecution));
            }
        }
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(TaskState::WaitingExecution.to_string(), "waiting_execution");
        assert_eq!(
            "parsing".parse::<TaskState>().unwrap(),
            TaskState::Parsing
        );
        assert!("running".parse::<TaskState>().is_err());
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&TaskState::Fetching).unwrap();
        assert_eq!(json, "\"fetching\"");
        let parsed: TaskState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TaskState::Fetching);
    }
}
