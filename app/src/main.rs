//! Simple CLI demo for the todo application.
//!
//! Adds and deletes todos, then loads more from a todos endpoint
//! (`TODOS_URL`, defaulting to `http://localhost:3000`). Without a server
//! running the fetch simply ends in the FAILURE leg of the lifecycle.

use todoflow::{
    TodoAction, TodoEnvironment, TodoState, TodosReducer, add_todo, delete_todo, fetch_todos,
};
use todoflow_runtime::Store;

async fn print_todos(store: &Store<TodoState, TodoAction, TodoEnvironment, TodosReducer>) {
    let todos = store.state(|s| s.todos.clone()).await;
    for todo in &todos {
        let status = if todo.completed { "x" } else { " " };
        println!("  [{status}] #{} {}", todo.id, todo.text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== todoflow demo ===\n");

    let base_url =
        std::env::var("TODOS_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let env = TodoEnvironment::http(base_url.clone());
    let store = Store::new(TodoState::seed(), TodosReducer::new(), env);

    println!("Adding todos...");
    store.send(add_todo("Run 2 miles")).await?;
    store.send(add_todo("Write documentation")).await?;
    print_todos(&store).await;

    println!("\nDeleting the newest todo...");
    store.send(delete_todo(0)).await?;
    print_todos(&store).await;

    println!("\nFetching todos from {base_url} ...");
    let mut handle = store.dispatch(fetch_todos().into()).await?;
    handle.wait().await;
    print_todos(&store).await;

    let count = store.state(TodoState::len).await;
    println!("\nTotal todos: {count}");

    println!("\n=== demo complete ===");
    Ok(())
}
