//! # Todoflow Testing
//!
//! Testing utilities and helpers for todoflow reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: a fluent Given-When-Then harness for reducers
//! - [`recorder::ActionRecorder`]: records the exact dispatched-action
//!   sequence of a store, for asserting on action lifecycles
//! - Assertion helpers for reducer-returned effects
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_testing::recorder::ActionRecorder;
//!
//! #[tokio::test]
//! async fn fetch_dispatches_request_then_success() {
//!     let store = Store::new(TodoState::default(), TodosReducer::new(), env);
//!     let mut recorder = ActionRecorder::new(store.subscribe_actions());
//!
//!     let mut handle = store.dispatch(fetch_todos().into()).await?;
//!     handle.wait().await;
//!
//!     let actions = recorder.drain();
//!     assert!(matches!(actions[0], TodoAction::FetchTodosRequest));
//! }
//! ```


/// Dispatched-action recording for store tests
///
/// The store broadcasts every action applied by its reducer, in application
/// order. An [`recorder::ActionRecorder`] subscribes to that stream and
/// collects it, so a test can assert on the exact sequence a thunk produced.
pub mod recorder {
    use tokio::sync::broadcast;

    /// Records the dispatched-action stream of a store.
    ///
    /// Construct it from [`subscribe_actions`] BEFORE dispatching, so no
    /// action is missed, then collect after the work completes.
    ///
    /// [`subscribe_actions`]: todoflow_runtime::Store::subscribe_actions
    #[derive(Debug)]
    pub struct ActionRecorder<A> {
        receiver: broadcast::Receiver<A>,
    }

    impl<A: Clone> ActionRecorder<A> {
        /// Create a recorder over a store's action stream.
        #[must_use]
        pub const fn new(receiver: broadcast::Receiver<A>) -> Self {
            Self { receiver }
        }

        /// Await the next dispatched action.
        ///
        /// Returns `None` if the store (and with it the broadcast channel)
        /// was dropped.
        pub async fn recv(&mut self) -> Option<A> {
            loop {
                match self.receiver.recv().await {
                    Ok(action) => return Some(action),
                    // A lagged recorder is a test sizing problem, not a
                    // store problem; skip and keep reading.
                    Err(broadcast::error::RecvError::Lagged(_)) => {},
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }

        /// Collect every action dispatched so far without waiting.
        ///
        /// Call after awaiting the relevant [`EffectHandle`], at which point
        /// the full sequence is buffered.
        ///
        /// [`EffectHandle`]: todoflow_runtime::EffectHandle
        pub fn drain(&mut self) -> Vec<A> {
            let mut actions = Vec::new();
            while let Ok(action) = self.receiver.try_recv() {
                actions.push(action);
            }
            actions
        }
    }
}

// Re-export commonly used items
pub use recorder::ActionRecorder;
pub use reducer_test::{ReducerTest, assertions};
