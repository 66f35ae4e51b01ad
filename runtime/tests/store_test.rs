//! Integration tests for the Store.
//!
//! These exercise the full dispatch pipeline from outside the crate:
//! serialization of concurrent sends at the reducer, isolation between
//! store instances, and the subscription surfaces.

#![allow(clippy::unwrap_used)]

use std::time::Duration;
use todoflow_core::effect::Effect;
use todoflow_core::reducer::Reducer;
use todoflow_core::thunk::{Dispatchable, Thunk};
use todoflow_core::{SmallVec, smallvec};
use todoflow_runtime::{Store, StoreConfig, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CounterState {
    count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CounterAction {
    Increment,
    Decrement,
}

#[derive(Debug, Clone)]
struct CounterEnv;

#[derive(Debug, Clone)]
struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;
    type Environment = CounterEnv;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CounterAction::Increment => state.count += 1,
            CounterAction::Decrement => state.count -= 1,
        }
        smallvec![Effect::None]
    }
}

fn counter_store() -> Store<CounterState, CounterAction, CounterEnv, CounterReducer> {
    Store::new(CounterState::default(), CounterReducer, CounterEnv)
}

#[tokio::test]
async fn sends_serialize_at_the_reducer() {
    let store = counter_store();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let _ = store.send(CounterAction::Increment).await;
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.state(|s| s.count).await, 10);
}

#[tokio::test]
async fn stores_are_isolated_instances() {
    let store1 = counter_store();
    let store2 = counter_store();

    let _ = store1.send(CounterAction::Increment).await;
    let _ = store1.send(CounterAction::Increment).await;
    let _ = store2.send(CounterAction::Decrement).await;

    assert_eq!(store1.state(|s| s.count).await, 2);
    assert_eq!(store2.state(|s| s.count).await, -1);
}

#[tokio::test]
async fn external_initial_state_is_respected() {
    let store = Store::new(CounterState { count: 40 }, CounterReducer, CounterEnv);

    let _ = store.send(CounterAction::Increment).await;
    let _ = store.send(CounterAction::Increment).await;

    assert_eq!(store.state(|s| s.count).await, 42);
}

#[tokio::test]
async fn state_subscription_sees_the_latest_value() {
    let store = counter_store();
    let mut rx = store.subscribe();

    assert_eq!(rx.borrow().count, 0);

    let _ = store.send(CounterAction::Increment).await;
    rx.changed().await.unwrap();

    assert_eq!(rx.borrow_and_update().count, 1);
}

#[tokio::test]
async fn thunk_interleaves_with_plain_sends() {
    let store = counter_store();

    let thunk: Thunk<CounterAction, CounterEnv> =
        Thunk::new(|dispatch, _env: CounterEnv| async move {
            dispatch.send(CounterAction::Increment).await;
            dispatch.send(CounterAction::Increment).await;
        });

    let mut handle = store.dispatch(Dispatchable::Thunk(thunk)).await.unwrap();
    let _ = store.send(CounterAction::Increment).await;
    handle.wait().await;

    // Relative order of the thunk's sends and the plain send is not
    // guaranteed; the totals are.
    assert_eq!(store.state(|s| s.count).await, 3);
}

#[tokio::test]
async fn shutdown_rejects_new_dispatches() {
    let store = Store::with_config(
        CounterState::default(),
        CounterReducer,
        CounterEnv,
        StoreConfig::default().with_shutdown_timeout(Duration::from_secs(1)),
    );

    store.shutdown().await.unwrap();

    assert!(matches!(
        store.send(CounterAction::Increment).await,
        Err(StoreError::ShutdownInProgress)
    ));

    let thunk: Thunk<CounterAction, CounterEnv> =
        Thunk::new(|_dispatch, _env: CounterEnv| async move {});
    assert!(matches!(
        store.dispatch(Dispatchable::Thunk(thunk)).await,
        Err(StoreError::ShutdownInProgress)
    ));
}
