use netask_core::state_machine::{TaskEvent, TaskState};
use proptest::prelude::*;
use proptest::strategy::Just;

/// Strategy for max-age values, including zero
pub fn max_age_strategy() -> impl Strategy<Value = u64> {
    0u64..=86_400
}

/// Strategy for entry ages in milliseconds
pub fn age_millis_strategy() -> impl Strategy<Value = i64> {
    0i64..=172_800_000
}

/// Strategy for Cache-Control directives that forbid reuse
pub fn disallowing_directive_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("no-store"), Just("no-cache"), Just("no-store, max-age=600")]
}

pub fn task_state_strategy() -> impl Strategy<Value = TaskState> {
    prop::sample::select(TaskState::ALL.to_vec())
}

pub fn task_event_strategy() -> impl Strategy<Value = TaskEvent> {
    prop_oneof![
        Just(TaskEvent::Enqueue),
        Just(TaskEvent::BeginFetch),
        Just(TaskEvent::BeginParse),
        Just(TaskEvent::Finish),
        Just(TaskEvent::Cancel),
    ]
}
