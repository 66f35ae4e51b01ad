//! Action creators for the todo list.
//!
//! The plain creators are pure value constructors; [`fetch_todos`] is the
//! one deferred computation, dispatched as a thunk so it can drive the
//! REQUEST → SUCCESS | FAILURE lifecycle around a single network call.

use crate::api::TodoEnvironment;
use crate::types::TodoAction;
use std::sync::Arc;
use todoflow_core::thunk::Thunk;

/// Create an [`TodoAction::AddTodo`] action
///
/// No validation: any string, including the empty string, is accepted.
#[must_use]
pub fn add_todo(text: impl Into<String>) -> TodoAction {
    TodoAction::AddTodo { text: text.into() }
}

/// Create a [`TodoAction::DeleteTodo`] action for a positional index
///
/// No bounds checking here; the reducer tolerates out-of-range indices.
#[must_use]
pub const fn delete_todo(index: usize) -> TodoAction {
    TodoAction::DeleteTodo { index }
}

/// Create the asynchronous fetch-todos thunk
///
/// When the store executes it, the thunk:
/// 1. dispatches [`TodoAction::FetchTodosRequest`];
/// 2. issues `GET /todos` through the environment's [`TodosApi`];
/// 3. dispatches [`TodoAction::FetchTodosSuccess`] with the decoded body,
///    or [`TodoAction::FetchTodosFailure`] with the captured error.
///
/// REQUEST always precedes the terminal action, and exactly one of
/// SUCCESS/FAILURE follows. The handle returned by
/// `store.dispatch(fetch_todos().into())` resolves once the whole sequence
/// has been dispatched.
///
/// [`TodosApi`]: crate::api::TodosApi
#[must_use]
pub fn fetch_todos() -> Thunk<TodoAction, TodoEnvironment> {
    Thunk::new(|dispatch, env: TodoEnvironment| async move {
        dispatch.send(TodoAction::FetchTodosRequest).await;

        match env.api.fetch_todos().await {
            Ok(body) => {
                dispatch.send(TodoAction::FetchTodosSuccess { body }).await;
            }
            Err(error) => {
                tracing::warn!(%error, "Todos fetch failed");
                dispatch
                    .send(TodoAction::FetchTodosFailure {
                        error: Arc::new(error),
                    })
                    .await;
            }
        }
    })
}
