//! Reducer logic for the todo list.
//!
//! A pure state machine: every action maps to a synchronous list
//! transformation and no effects. The asynchronous fetch lifecycle lives in
//! [`crate::actions::fetch_todos`]; by the time its actions reach this
//! reducer they are plain data.

use crate::api::TodoEnvironment;
use crate::types::{Todo, TodoAction, TodoState};
use todoflow_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl TodosReducer {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodosReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo { text } => {
                // New ids continue from the current maximum; an empty list
                // starts over at 0.
                let todo = Todo::new(state.max_id() + 1, text);
                state.todos.insert(0, todo);
            }

            TodoAction::DeleteTodo { index } => {
                // Positional removal. An out-of-range index matches no
                // position and removes nothing.
                let mut position = 0;
                state.todos.retain(|_| {
                    let keep = position != index;
                    position += 1;
                    keep
                });
            }

            TodoAction::FetchTodosSuccess { body } => {
                // The fetched batch is prepended in server order. Ids are
                // positions within the batch, independent of ids already in
                // state (kept as-is for compatibility; see the collision
                // test below).
                let mut next: Vec<Todo> =
                    Vec::with_capacity(body.todos.len() + state.todos.len());
                next.extend(
                    (0i64..)
                        .zip(body.todos)
                        .map(|(id, text)| Todo::new(id, text)),
                );
                next.append(&mut state.todos);
                state.todos = next;
            }

            // Deliberate identity transitions: the request and failure legs
            // of the fetch lifecycle carry no state change. Loading/error
            // presentation belongs to subscribers.
            TodoAction::FetchTodosRequest | TodoAction::FetchTodosFailure { .. } => {}
        }

        // Pure state machine - no side effects
        smallvec![Effect::None]
    }
}
