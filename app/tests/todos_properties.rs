//! Property tests for the todos reducer.
//!
//! The reducer's contracts are universally quantified ("for all texts...",
//! "for all states..."), so they are checked with generated states rather
//! than hand-picked examples.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use todoflow::{
    Todo, TodoAction, TodoEnvironment, TodoState, TodosBody, TodosReducer, add_todo, delete_todo,
};
use todoflow_core::reducer::Reducer;

// The reducer never touches the environment.
fn test_env() -> TodoEnvironment {
    TodoEnvironment::http("http://127.0.0.1:9")
}

fn reduce(state: &TodoState, action: TodoAction) -> TodoState {
    let mut next = state.clone();
    let _ = TodosReducer::new().reduce(&mut next, action, &test_env());
    next
}

prop_compose! {
    fn arb_todo()(id in 0i64..10_000, text in ".{0,24}", completed in any::<bool>()) -> Todo {
        Todo { id, text, completed }
    }
}

prop_compose! {
    fn arb_state()(todos in prop::collection::vec(arb_todo(), 0..12)) -> TodoState {
        TodoState { todos }
    }
}

proptest! {
    #[test]
    fn add_prepends_a_fresh_incomplete_todo(state in arb_state(), text in ".{0,24}") {
        let next = reduce(&state, add_todo(text.clone()));

        prop_assert_eq!(next.len(), state.len() + 1);
        prop_assert_eq!(&next.todos[0].text, &text);
        prop_assert!(!next.todos[0].completed);
        prop_assert_eq!(next.todos[0].id, state.max_id() + 1);
        prop_assert_eq!(&next.todos[1..], &state.todos[..]);
    }

    #[test]
    fn delete_in_range_removes_exactly_that_position(state in arb_state(), position in any::<prop::sample::Index>()) {
        prop_assume!(!state.is_empty());
        let index = position.index(state.len());

        let next = reduce(&state, delete_todo(index));

        prop_assert_eq!(next.len(), state.len() - 1);
        prop_assert_eq!(&next.todos[..index], &state.todos[..index]);
        prop_assert_eq!(&next.todos[index..], &state.todos[index + 1..]);
    }

    #[test]
    fn delete_out_of_range_is_identity(state in arb_state(), offset in 0usize..8) {
        let next = reduce(&state, delete_todo(state.len() + offset));

        prop_assert_eq!(next, state);
    }

    #[test]
    fn fetch_success_prepends_body_with_positional_ids(
        state in arb_state(),
        texts in prop::collection::vec(".{0,24}", 0..8),
    ) {
        let next = reduce(&state, TodoAction::FetchTodosSuccess {
            body: TodosBody { todos: texts.clone() },
        });

        prop_assert_eq!(next.len(), texts.len() + state.len());
        for (position, text) in texts.iter().enumerate() {
            prop_assert_eq!(&next.todos[position].text, text);
            prop_assert_eq!(next.todos[position].id, i64::try_from(position).unwrap());
            prop_assert!(!next.todos[position].completed);
        }
        prop_assert_eq!(&next.todos[texts.len()..], &state.todos[..]);
    }

    #[test]
    fn request_and_failure_are_identity_transitions(state in arb_state()) {
        let next = reduce(&state, TodoAction::FetchTodosRequest);
        prop_assert_eq!(&next, &state);

        let error = serde_json::from_str::<TodosBody>("{").unwrap_err();
        let next = reduce(&state, TodoAction::FetchTodosFailure {
            error: std::sync::Arc::new(error.into()),
        });
        prop_assert_eq!(&next, &state);
    }
}
