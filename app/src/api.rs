//! Todos endpoint client and the reducer/thunk environment.

use crate::types::{FetchError, TodosBody};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Path of the todos resource, relative to the service base URL
const TODOS_PATH: &str = "/todos";

/// Boxed future returned by [`TodosApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Client for the todos endpoint
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
/// `async fn` to enable trait object usage (`Arc<dyn TodosApi>`). This is
/// required for the environment, which is cloned into thunks.
pub trait TodosApi: Send + Sync {
    /// Fetch the todo list: `GET /todos`
    ///
    /// # Errors
    ///
    /// - [`FetchError::Request`]: transport failure or non-2xx status
    /// - [`FetchError::Decode`]: body is not the expected JSON shape
    fn fetch_todos(&self) -> ApiFuture<'_, Result<TodosBody, FetchError>>;
}

/// `reqwest`-backed [`TodosApi`] against a fixed base URL
#[derive(Clone, Debug)]
pub struct HttpTodosApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTodosApi {
    /// Create a client for the service at `base_url` (no trailing slash)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl TodosApi for HttpTodosApi {
    fn fetch_todos(&self) -> ApiFuture<'_, Result<TodosBody, FetchError>> {
        let request = self.client.get(format!("{}{TODOS_PATH}", self.base_url));

        Box::pin(async move {
            tracing::debug!(path = TODOS_PATH, "Fetching todos");

            let response = request.send().await?.error_for_status()?;

            // Decode from text rather than `Response::json` so transport
            // failures and malformed bodies surface as distinct variants.
            let text = response.text().await?;
            let body: TodosBody = serde_json::from_str(&text)?;

            tracing::debug!(count = body.todos.len(), "Fetched todos");
            Ok(body)
        })
    }
}

/// Injected dependencies for the todos reducer and thunks
///
/// Cloned into every thunk the store executes; keep it cheap to clone.
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Client for the todos endpoint
    pub api: Arc<dyn TodosApi>,
}

impl TodoEnvironment {
    /// Creates an environment around any [`TodosApi`] implementation
    #[must_use]
    pub fn new(api: Arc<dyn TodosApi>) -> Self {
        Self { api }
    }

    /// Convenience: an environment backed by [`HttpTodosApi`]
    #[must_use]
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpTodosApi::new(base_url)))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("api", &"<dyn TodosApi>")
            .finish()
    }
}
