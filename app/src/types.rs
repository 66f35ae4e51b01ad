//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of [`Todo`] items; insertion order is
//! display order. State is owned exclusively by the store and replaced, never
//! mutated in place, by the reducer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// List-derived identifier; see [`TodoState::max_id`] for assignment
    pub id: i64,
    /// The todo's text; empty strings are allowed
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not-yet-completed todo
    #[must_use]
    pub const fn new(id: i64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }
}

/// State of the todo list
///
/// Ordered, newest first: additions and fetched batches are prepended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos, insertion order = display order
    pub todos: Vec<Todo>,
}

impl TodoState {
    /// Creates an empty todo list
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// The fixed startup state: a single `use Redux` todo with id 0
    #[must_use]
    pub fn seed() -> Self {
        Self {
            todos: vec![Todo::new(0, "use Redux".to_string())],
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Checks whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// The largest id currently in the list, or -1 for an empty list
    ///
    /// The next added todo gets `max_id() + 1`, so ids restart at 0 on an
    /// empty list.
    #[must_use]
    pub fn max_id(&self) -> i64 {
        self.todos.iter().fold(-1, |max_id, todo| max_id.max(todo.id))
    }
}

/// Wire body of the `GET /todos` response: `{ "todos": ["...", ...] }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosBody {
    /// Todo texts, in server order
    pub todos: Vec<String>,
}

/// Why a todos fetch failed
///
/// Both variants flow into the single [`TodoAction::FetchTodosFailure`]
/// channel; the split exists so logs can tell a dead endpoint from a
/// malformed body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: unreachable endpoint, timeout, or a
    /// non-2xx status
    #[error("todos request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape
    #[error("todos body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Actions accepted by the todos reducer
///
/// Created by the action creators in [`crate::actions`], consumed exactly
/// once by the reducer. The fetch lifecycle spans three variants: REQUEST,
/// then exactly one of SUCCESS or FAILURE.
#[derive(Clone, Debug)]
pub enum TodoAction {
    /// Add a todo with the given text (no validation; empty is fine)
    AddTodo {
        /// Text of the new todo
        text: String,
    },

    /// Delete the todo at a positional index (NOT a todo id)
    DeleteTodo {
        /// Position in the current list; out-of-range is a no-op
        index: usize,
    },

    /// A todos fetch was started
    FetchTodosRequest,

    /// A todos fetch returned a well-formed body
    FetchTodosSuccess {
        /// The decoded response body
        body: TodosBody,
    },

    /// A todos fetch failed (transport or decode)
    FetchTodosFailure {
        /// The captured error; `Arc` keeps the action cheaply cloneable
        /// for broadcast
        error: Arc<FetchError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_state_is_the_single_use_redux_todo() {
        let state = TodoState::seed();

        assert_eq!(
            state.todos,
            vec![Todo {
                id: 0,
                text: "use Redux".to_string(),
                completed: false,
            }]
        );
    }

    #[test]
    fn max_id_of_empty_list_is_minus_one() {
        assert_eq!(TodoState::new().max_id(), -1);
    }

    #[test]
    fn max_id_ignores_order() {
        let state = TodoState {
            todos: vec![
                Todo::new(2, "a".to_string()),
                Todo::new(7, "b".to_string()),
                Todo::new(3, "c".to_string()),
            ],
        };

        assert_eq!(state.max_id(), 7);
    }

    #[test]
    fn todos_body_decodes_wire_shape() {
        #[allow(clippy::unwrap_used)]
        let body: TodosBody =
            serde_json::from_str(r#"{"todos": ["Do something awesome", "Join a book club"]}"#)
                .unwrap();

        assert_eq!(body.todos, vec!["Do something awesome", "Join a book club"]);
    }
}
