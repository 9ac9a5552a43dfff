mod common;

use bytes::Bytes;
use chrono::Duration;
use common::strategies::*;
use common::{epoch, headers, http_date};
use http::{Method, StatusCode};
use netask_core::cache::{CacheControl, CacheDecision, CachePolicy, CachedEntry, MissReason, StoragePolicy};
use netask_core::cache::entry::EntryMetadata;
use netask_core::http::{HeaderAliases, HttpRequest};
use netask_core::state_machine::TaskStateMachine;
use netask_core::task::{CallbackQueue, TaskId};
use proptest::prelude::*;

fn entry_with(pairs: &[(&str, &str)]) -> CachedEntry {
    CachedEntry {
        status: StatusCode::OK,
        headers: headers(pairs),
        body: Bytes::from_static(b"{}"),
        metadata: EntryMetadata {
            method: Method::GET,
            accept_language: None,
            stored_at: epoch(),
        },
        storage_policy: StoragePolicy::Allowed,
    }
}

proptest! {
    /// Property: a max-age entry is a hit exactly while its age is below the lifetime
    #[test]
    fn max_age_window_is_exact(max_age in max_age_strategy(), age_ms in age_millis_strategy()) {
        let policy = CachePolicy::new(HeaderAliases::default());
        let cache_control = format!("max-age={max_age}");
        let date = http_date(epoch());
        let entry = entry_with(&[("cache-control", cache_control.as_str()), ("date", date.as_str())]);
        let request = HttpRequest::get(common::ITEMS_URL);
        let now = epoch() + Duration::milliseconds(age_ms);

        let decision = policy.evaluate(Some(&entry), &request, &entry.headers, now);
        let expected_hit = (age_ms as u128) < u128::from(max_age) * 1000;
        prop_assert_eq!(decision.is_hit(), expected_hit, "age {}ms, max-age {}s: {}", age_ms, max_age, decision);
        prop_assert!(decision.is_hit() || decision.is_expired());
    }

    /// Property: no-store / no-cache always produce a miss under the default hook
    #[test]
    fn disallowing_directives_always_miss(directive in disallowing_directive_strategy(), age_ms in age_millis_strategy()) {
        let policy = CachePolicy::new(HeaderAliases::default());
        let date = http_date(epoch());
        let entry = entry_with(&[("cache-control", directive), ("date", date.as_str())]);
        let request = HttpRequest::get(common::ITEMS_URL);

        let decision = policy.evaluate(Some(&entry), &request, &entry.headers, epoch() + Duration::milliseconds(age_ms));
        prop_assert_eq!(decision.miss_reason(), Some(MissReason::CachingDisallowed));
    }

    /// Property: parsing arbitrary Cache-Control text never panics and is consistent
    #[test]
    fn cache_control_parse_is_total(header in "[a-zA-Z0-9=,\" -]{0,64}") {
        let cc = CacheControl::parse(&header);
        prop_assert_eq!(cc.allows_caching(), !cc.no_cache && !cc.no_store);
    }

    /// Property: the state machine only ever moves along the transition table
    #[test]
    fn state_machine_follows_transition_table(events in prop::collection::vec(task_event_strategy(), 0..24)) {
        let machine = TaskStateMachine::new(TaskId::new(), CallbackQueue::inline());
        for event in events {
            let before = machine.current_state();
            let legal = before.can_transition_to(event.target_state());
            let result = machine.transition(event);
            prop_assert_eq!(result.is_ok(), legal, "{:?} from {}", event, before);
            if legal {
                prop_assert_eq!(machine.current_state(), event.target_state());
            } else {
                prop_assert_eq!(machine.current_state(), before);
            }
        }
    }

    /// Property: only WaitingExecution and Fetching are cancellable
    #[test]
    fn cancellable_states_are_active(state in task_state_strategy()) {
        if state.is_cancellable() {
            prop_assert!(state.is_active());
            prop_assert!(state.can_transition_to(netask_core::state_machine::TaskState::Cancelled));
        }
    }
}

#[test]
fn unsuccessful_entries_never_hit() {
    let policy = CachePolicy::new(HeaderAliases::default());
    let date = http_date(epoch());
    let mut entry = entry_with(&[("cache-control", "max-age=600"), ("date", date.as_str())]);
    entry.status = StatusCode::NOT_FOUND;

    let decision = policy.evaluate(
        Some(&entry),
        &HttpRequest::get(common::ITEMS_URL),
        &entry.headers,
        epoch(),
    );
    assert!(matches!(decision, CacheDecision::Miss(MissReason::UnsuccessfulStatus)));
}
