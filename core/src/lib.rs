//! # Todoflow Core
//!
//! Core traits and types for the todoflow unidirectional data flow.
//!
//! This crate provides the fundamental abstractions for a Redux-style state
//! container: a pure reducer computes the next state from the current state
//! and an action, while anything asynchronous is expressed as an explicit
//! value — either an [`effect::Effect`] returned by the reducer, or a
//! [`thunk::Thunk`] submitted to the store in place of a plain action.
//!
//! ## Core Concepts
//!
//! - **State**: owned domain state, exclusively held by the store
//! - **Action**: all possible inputs to a reducer
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Thunk**: a deferred computation dispatched instead of a plain action,
//!   invoked with a dispatch handle so it can feed plain actions back over time
//! - **Environment**: injected dependencies (HTTP clients, clocks, ...)
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O inside reducers)
//! - Dependency injection via the environment parameter
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_core::{reducer::Reducer, effect::Effect, smallvec, SmallVec};
//!
//! impl Reducer for TodosReducer {
//!     type State = TodoState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoState,
//!         action: TodoAction,
//!         env: &TodoEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         // business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// A reducer must not perform I/O. Anything observable beyond the state
    /// transition is described by the returned effects and executed by the
    /// store runtime.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Runs to completion synchronously: the caller installs the new
        /// state before anything else observes it.
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. A pure state machine
        /// returns `smallvec![Effect::None]`.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) returned from reducers.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Thunk module - deferred computations dispatched in place of plain actions
///
/// A store accepts a [`thunk::Dispatchable`], which is either a plain action
/// routed straight to the reducer, or a [`thunk::Thunk`]: a one-shot async
/// computation invoked with a [`thunk::Dispatcher`] handle and a clone of
/// the environment. The thunk drives multi-step side effects
/// (request/success/failure lifecycles) by feeding plain actions back
/// through the dispatcher.
pub mod thunk {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    /// Boxed future returned by thunks and dispatch handles.
    pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

    /// Type-erased dispatch handle handed to thunks.
    ///
    /// Cloneable and `Send`, so a thunk can carry it across await points.
    /// Dispatching a plain action through the handle runs the reducer before
    /// the returned future resolves.
    ///
    /// This type deliberately hides the store: thunks depend only on the
    /// action type, not on the store's state/reducer parameters.
    pub struct Dispatcher<A> {
        send: Arc<dyn Fn(A) -> BoxFuture<()> + Send + Sync>,
    }

    impl<A> Dispatcher<A> {
        /// Create a dispatcher from a send function.
        ///
        /// The runtime constructs this from a clone of the store; tests can
        /// construct one from a channel sender to observe dispatches.
        #[must_use]
        pub fn new<F>(send: F) -> Self
        where
            F: Fn(A) -> BoxFuture<()> + Send + Sync + 'static,
        {
            Self {
                send: Arc::new(send),
            }
        }

        /// Dispatch a plain action back into the store.
        pub async fn send(&self, action: A) {
            (self.send)(action).await;
        }
    }

    impl<A> Clone for Dispatcher<A> {
        fn clone(&self) -> Self {
            Self {
                send: Arc::clone(&self.send),
            }
        }
    }

    impl<A> std::fmt::Debug for Dispatcher<A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Dispatcher(<fn>)")
        }
    }

    /// A deferred computation dispatched in place of a plain action.
    ///
    /// Wraps a one-shot async function of `(Dispatcher, Environment)`. The
    /// store runtime invokes it with a dispatch handle and a clone of its
    /// environment; the thunk dispatches plain actions as it progresses.
    ///
    /// # Example
    ///
    /// ```ignore
    /// fn fetch_todos() -> Thunk<TodoAction, TodoEnvironment> {
    ///     Thunk::new(|dispatch, env: TodoEnvironment| async move {
    ///         dispatch.send(TodoAction::FetchTodosRequest).await;
    ///         match env.api.fetch_todos().await {
    ///             Ok(body) => dispatch.send(TodoAction::FetchTodosSuccess { body }).await,
    ///             Err(error) => {
    ///                 dispatch
    ///                     .send(TodoAction::FetchTodosFailure { error: error.into() })
    ///                     .await;
    ///             }
    ///         }
    ///     })
    /// }
    /// ```
    pub struct Thunk<A, E> {
        run: Box<dyn FnOnce(Dispatcher<A>, E) -> BoxFuture<()> + Send>,
    }

    impl<A, E> Thunk<A, E> {
        /// Create a thunk from an async function of `(dispatcher, environment)`.
        #[must_use]
        pub fn new<F, Fut>(f: F) -> Self
        where
            F: FnOnce(Dispatcher<A>, E) -> Fut + Send + 'static,
            Fut: Future<Output = ()> + Send + 'static,
        {
            Self {
                run: Box::new(move |dispatcher, env| Box::pin(f(dispatcher, env))),
            }
        }

        /// Consume the thunk, producing its future.
        #[must_use]
        pub fn run(self, dispatcher: Dispatcher<A>, env: E) -> BoxFuture<()> {
            (self.run)(dispatcher, env)
        }
    }

    impl<A, E> std::fmt::Debug for Thunk<A, E> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Thunk(<fn>)")
        }
    }

    /// A value accepted by the store's dispatch pipeline.
    ///
    /// Either a plain action applied synchronously by the reducer, or a
    /// [`Thunk`] scheduled onto the runtime. The store pattern-matches on
    /// the variant; there is no other routing.
    pub enum Dispatchable<A, E> {
        /// A plain action, applied by the reducer.
        Plain(A),
        /// A deferred computation, invoked with a dispatch handle.
        Thunk(Thunk<A, E>),
    }

    impl<A, E> From<Thunk<A, E>> for Dispatchable<A, E> {
        fn from(thunk: Thunk<A, E>) -> Self {
            Self::Thunk(thunk)
        }
    }

    impl<A, E> std::fmt::Debug for Dispatchable<A, E>
    where
        A: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Plain(action) => f.debug_tuple("Plain").field(action).finish(),
                Self::Thunk(_) => write!(f, "Thunk(<fn>)"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::thunk::{Dispatchable, Dispatcher, Thunk};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestAction {
        Ping,
        Pong,
    }

    fn recording_dispatcher() -> (Dispatcher<TestAction>, Arc<Mutex<Vec<TestAction>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let dispatcher = Dispatcher::new(move |action| {
            let log = Arc::clone(&log_clone);
            let fut: super::thunk::BoxFuture<()> = Box::pin(async move {
                log.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(action);
            });
            fut
        });
        (dispatcher, log)
    }

    #[tokio::test]
    async fn thunk_receives_dispatcher_and_environment() {
        let (dispatcher, log) = recording_dispatcher();

        let thunk: Thunk<TestAction, u32> = Thunk::new(|dispatch, env: u32| async move {
            assert_eq!(env, 7);
            dispatch.send(TestAction::Ping).await;
            dispatch.send(TestAction::Pong).await;
        });

        thunk.run(dispatcher, 7).await;

        let recorded = log
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        assert_eq!(recorded, vec![TestAction::Ping, TestAction::Pong]);
    }

    #[test]
    fn dispatchable_debug_hides_thunk_internals() {
        let plain: Dispatchable<TestAction, ()> = Dispatchable::Plain(TestAction::Ping);
        assert_eq!(format!("{plain:?}"), "Plain(Ping)");

        let thunk: Dispatchable<TestAction, ()> = Thunk::new(|_dispatch, ()| async move {}).into();
        assert_eq!(format!("{thunk:?}"), "Thunk(<fn>)");
    }
}
