//! Todo-list application core built on the todoflow unidirectional data flow.
//!
//! This crate wires the todo domain into the todoflow store:
//!
//! - Plain action creators ([`add_todo`], [`delete_todo`])
//! - The asynchronous [`fetch_todos`] thunk (REQUEST → SUCCESS | FAILURE
//!   around one `GET /todos`)
//! - A pure reducer performing the list transformations
//! - A `reqwest`-backed [`TodosApi`] environment
//!
//! # Quick Start
//!
//! ```no_run
//! use todoflow::{TodoEnvironment, TodoState, TodosReducer, add_todo, delete_todo, fetch_todos};
//! use todoflow_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create environment and store
//! let env = TodoEnvironment::http("http://localhost:3000");
//! let store = Store::new(TodoState::seed(), TodosReducer::new(), env);
//!
//! // Add a todo
//! store.send(add_todo("Buy milk")).await?;
//!
//! // Delete the todo at position 0
//! store.send(delete_todo(0)).await?;
//!
//! // Load todos from the server; await the full lifecycle
//! let mut handle = store.dispatch(fetch_todos().into()).await?;
//! handle.wait().await;
//!
//! // Read state
//! let count = store.state(todoflow::TodoState::len).await;
//! println!("Total todos: {count}");
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use actions::{add_todo, delete_todo, fetch_todos};
pub use api::{HttpTodosApi, TodoEnvironment, TodosApi};
pub use reducer::TodosReducer;
pub use types::{FetchError, Todo, TodoAction, TodoState, TodosBody};
