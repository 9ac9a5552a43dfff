// State machine module for network task lifecycle
//
// A task moves through a fixed transition table; every transition is checked against it
// and observers only ever see legal (old, new) pairs.

pub mod errors;
pub mod events;
pub mod states;
pub mod task_state_machine;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::TaskEvent;
pub use states::TaskState;
pub use task_state_machine::{StateObserver, TaskStateMachine};
