//! # Todoflow Runtime
//!
//! Runtime implementation for the todoflow unidirectional data flow.
//!
//! This crate provides the Store that coordinates reducer execution, thunk
//! scheduling, and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: holds the current state, applies the reducer on each plain
//!   action, and notifies subscribers
//! - **Dispatch pipeline**: pattern-matches on [`Dispatchable`] — plain
//!   actions run the reducer synchronously, thunks are scheduled onto the
//!   runtime with a dispatch handle
//! - **Effect execution**: reducer-returned effects run in spawned tasks and
//!   feed resulting actions back into the reducer
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Plain action: reducer runs before send returns
//! store.send(Action::DoSomething).await?;
//!
//! // Thunk: scheduled, handle can be awaited for completion
//! let mut handle = store.dispatch(Dispatchable::Thunk(fetch_things())).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use todoflow_core::effect::Effect;
use todoflow_core::reducer::Reducer;
use todoflow_core::thunk::{Dispatchable, Dispatcher};
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new work
        ///
        /// Returned when `send()` or `dispatch()` is called after shutdown
        /// was initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for in-flight work to complete
        ///
        /// Some thunks or effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} tasks still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effect completion
        ///
        /// Returned by [`super::EffectHandle::wait_with_timeout`] when the
        /// timeout expires first.
        #[error("Timeout waiting for effects to complete")]
        Timeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(256)
///     .with_shutdown_timeout(Duration::from_secs(60));
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Action broadcast channel capacity (number of actions buffered per
    /// subscriber before it lags)
    pub broadcast_capacity: usize,
    /// Timeout used by [`Store::shutdown`]
    pub shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a configuration with default values
    ///
    /// Defaults:
    /// - `broadcast_capacity`: 16
    /// - `shutdown_timeout`: 30 seconds
    #[must_use]
    pub const fn new() -> Self {
        Self {
            broadcast_capacity: 16,
            shutdown_timeout: Duration::from_secs(30),
        }
    }

    /// Set the action broadcast channel capacity
    ///
    /// Increase when many slow observers subscribe to the action stream.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the timeout used by [`Store::shutdown`]
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for tracking completion of the asynchronous work started by a
/// dispatch
///
/// Returned by [`Store::send`] and [`Store::dispatch`]. A plain action with
/// no effects completes immediately; a thunk's handle resolves when the
/// thunk future finishes (including every plain action it dispatched along
/// the way).
///
/// # Example
///
/// ```ignore
/// let mut handle = store.dispatch(Dispatchable::Thunk(fetch_todos())).await?;
/// handle.wait().await;
/// // The request/success-or-failure sequence has been fully dispatched.
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    pending: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle together with its internal tracking side.
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            pending: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that is already complete
    ///
    /// Useful as an initial value when accumulating the last handle in a
    /// loop of dispatches.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all tracked work to complete
    pub async fn wait(&mut self) {
        while self.pending.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all tracked work to complete, with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before the
    /// work completes.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context threaded through effect and thunk execution
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the pending counter (work started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the pending counter (work completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements the tracking counter on drop
///
/// Ensures the counter is always decremented, even if the tracked task
/// panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Internal: guard that decrements an atomic counter on drop (shutdown
/// tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution, thunk scheduling, and
/// effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Dispatchable, Dispatcher,
        Duration, Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig,
        StoreError, broadcast, watch,
    };

    /// The Store - runtime container for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind an `RwLock`, never exposed for direct mutation)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies, cloned into thunks)
    /// 4. Thunk and effect execution (with the action feedback loop)
    ///
    /// There is no ambient singleton: every instance is explicit, and tests
    /// construct independent instances with their own initial state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(TodoState::seed(), TodosReducer::new(), env);
    ///
    /// store.send(add_todo("use Redux")).await?;
    /// let len = store.state(|s| s.todos.len()).await;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_work: Arc<AtomicUsize>,
        shutdown_timeout: Duration,
        /// Every action applied by the reducer is re-broadcast to observers
        /// after the new state is installed. This is the hook behind
        /// dispatched-sequence assertions in tests and event streaming.
        action_broadcast: broadcast::Sender<A>,
        /// State notifications for subscribers; holds the latest state value.
        state_watch: Arc<watch::Sender<S>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses the default [`StoreConfig`]. The initial state is externally
        /// supplied, which is also the testing seam: tests construct stores
        /// over arbitrary starting states.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(state, reducer, env, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity);
            let (state_watch, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_work: Arc::new(AtomicUsize::new(0)),
                shutdown_timeout: config.shutdown_timeout,
                action_broadcast,
                state_watch: Arc::new(state_watch),
            }
        }

        /// Dispatch a plain action or a thunk
        ///
        /// Pattern-matches on the variant:
        /// - [`Dispatchable::Plain`]: the reducer runs synchronously and the
        ///   new state is installed before this method returns.
        /// - [`Dispatchable::Thunk`]: the thunk is spawned onto the runtime
        ///   with a dispatch handle and a clone of the environment; this
        ///   method returns immediately with a handle that resolves when the
        ///   thunk finishes.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is
        /// shutting down.
        #[tracing::instrument(skip(self, dispatchable), name = "store_dispatch")]
        pub async fn dispatch(
            &self,
            dispatchable: Dispatchable<A, E>,
        ) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            match dispatchable {
                Dispatchable::Plain(action) => self.send(action).await,
                Dispatchable::Thunk(thunk) => {
                    if self.shutdown.load(Ordering::Acquire) {
                        tracing::warn!("Rejected thunk: store is shutting down");
                        return Err(StoreError::ShutdownInProgress);
                    }

                    metrics::counter!("store.thunks.total").increment(1);
                    tracing::debug!("Scheduling thunk");

                    let (handle, tracking) = EffectHandle::new();
                    tracking.increment();

                    self.pending_work.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_work));

                    let dispatcher = self.dispatcher();
                    let environment = self.environment.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);
                        let _pending_guard = pending_guard; // Decrement on drop

                        thunk.run(dispatcher, environment).await;
                        tracing::trace!("Thunk completed");
                    });

                    Ok(handle)
                },
            }
        }

        /// Send a plain action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Installs the new state and notifies state subscribers
        /// 4. Re-broadcasts the action to action observers
        /// 5. Executes returned effects asynchronously
        ///
        /// Concurrent `send` calls serialize at the reducer; from the
        /// caller's perspective a send is atomic.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is
        /// shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates. Reducers should be
        /// pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();
            let observed = action.clone();

            let effects = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                // Publish the new state to subscribers while the write lock
                // still excludes other reducers.
                let _ = self.state_watch.send_replace((*state).clone());

                effects
            };

            // Observers see the action only after the state transition it
            // caused is installed.
            let _ = self.action_broadcast.send(observed);

            tracing::trace!("Executing {} effects", effects.len());
            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Create a type-erased dispatch handle bound to this store
        ///
        /// Thunks receive this handle; each `send` through it runs the full
        /// plain-action pipeline.
        #[must_use]
        pub fn dispatcher(&self) -> Dispatcher<A>
        where
            R: Clone,
            E: Clone,
        {
            let store = self.clone();
            Dispatcher::new(move |action| {
                let store = store.clone();
                let fut: todoflow_core::thunk::BoxFuture<()> = Box::pin(async move {
                    if let Err(error) = store.send(action).await {
                        tracing::warn!(%error, "Dispatch from thunk rejected");
                    }
                });
                fut
            })
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure so the read lock is released
        /// promptly:
        ///
        /// ```ignore
        /// let len = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to state changes
        ///
        /// Returns a `watch` receiver holding the latest state. Each
        /// installed state transition notifies the receiver; slow consumers
        /// only ever observe the most recent value.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.state_watch.subscribe()
        }

        /// Subscribe to the dispatched-action stream
        ///
        /// Every plain action applied by the reducer is broadcast, in
        /// application order, after its state transition is installed. This
        /// is the hook for asserting dispatched sequences in tests and for
        /// streaming actions to external observers.
        ///
        /// If a receiver lags beyond the configured capacity it skips old
        /// actions and observes `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new dispatches), then waits for
        /// in-flight thunks and effects to complete, up to the configured
        /// shutdown timeout. In-flight work is never cancelled; a fetch that
        /// outlives the timeout keeps running detached.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires
        /// with work still running.
        pub async fn shutdown(&self) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(100);

            loop {
                let pending = self.pending_work.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All in-flight work completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= self.shutdown_timeout {
                    tracing::error!(pending, "Shutdown timed out with work still running");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(pending, "Waiting for in-flight work");
                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute a reducer-returned effect with completion tracking
        ///
        /// `None` is a no-op. `Future` runs in a spawned task; if it yields
        /// an action, that action is sent back through the store (the
        /// feedback loop). The [`DecrementGuard`] keeps the handle's counter
        /// correct even if the effect panics.
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    tracking.increment();

                    self.pending_work.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_work));

                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);
                        let _pending_guard = pending_guard; // Decrement on drop

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, feeding back");
                            let _ = store.send(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_work: Arc::clone(&self.pending_work),
                shutdown_timeout: self.shutdown_timeout,
                action_broadcast: self.action_broadcast.clone(),
                state_watch: Arc::clone(&self.state_watch),
            }
        }
    }
}

pub use store::Store;
