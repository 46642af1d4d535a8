//! Integration tests for Store listeners and action observers
//!
//! Listeners receive the committed state after every dispatch; action
//! observers receive every dispatched action through a broadcast channel.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tidy_core::reducer::Reducer;
use tidy_runtime::{Store, StoreConfig, SubscriptionId};
use tidy_testing::RecordingListener;
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    Add(i64),
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TestState {
    total: i64,
    applied: usize,
}

#[derive(Clone)]
struct TestEnvironment;

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
        _env: &Self::Environment,
    ) -> Self::State {
        match action {
            TestAction::Add(amount) => TestState {
                total: state.total + amount,
                applied: state.applied + 1,
            },
            TestAction::Reset => TestState {
                total: 0,
                applied: state.applied + 1,
            },
        }
    }
}

type TestStore = Store<TestState, TestAction, TestEnvironment, TestReducer>;

fn test_store() -> TestStore {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

/// Drains everything currently buffered for an observer
fn drain(rx: &mut tokio::sync::broadcast::Receiver<TestAction>) -> Vec<TestAction> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

// ============================================================================
// Action observers
// ============================================================================

/// Observers receive every dispatched action, in dispatch order
#[tokio::test]
async fn test_subscribe_actions_in_dispatch_order() {
    let store = test_store();
    let mut rx = store.subscribe_actions();

    store.send(TestAction::Add(2)).await.unwrap();
    store.send(TestAction::Reset).await.unwrap();
    store.send(TestAction::Add(5)).await.unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![TestAction::Add(2), TestAction::Reset, TestAction::Add(5)]
    );
}

/// An observer only sees actions dispatched after it subscribed
#[tokio::test]
async fn test_late_observer_misses_earlier_actions() {
    let store = test_store();

    store.send(TestAction::Add(1)).await.unwrap();
    let mut rx = store.subscribe_actions();
    store.send(TestAction::Add(2)).await.unwrap();

    assert_eq!(drain(&mut rx), vec![TestAction::Add(2)]);
}

/// Multiple observers operate independently
#[tokio::test]
async fn test_multiple_independent_observers() {
    let store = test_store();

    let mut rx1 = store.subscribe_actions();
    let mut rx2 = store.subscribe_actions();

    store.send(TestAction::Add(1)).await.unwrap();
    assert_eq!(drain(&mut rx1), vec![TestAction::Add(1)]);

    store.send(TestAction::Add(2)).await.unwrap();
    assert_eq!(drain(&mut rx1), vec![TestAction::Add(2)]);
    assert_eq!(drain(&mut rx2), vec![TestAction::Add(1), TestAction::Add(2)]);
}

/// A slow observer skips old actions without blocking the store
#[tokio::test]
async fn test_lagging_observer() {
    let store = Store::with_config(
        TestState::default(),
        TestReducer,
        TestEnvironment,
        StoreConfig::default().with_action_broadcast_capacity(4),
    );
    let mut rx = store.subscribe_actions();

    for n in 0..20 {
        store.send(TestAction::Add(n)).await.unwrap();
    }

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(16))));

    // The most recent actions are still there
    assert_eq!(
        drain(&mut rx),
        (16..20).map(TestAction::Add).collect::<Vec<_>>()
    );
    assert_eq!(store.state(|s| s.applied).await, 20);
}

/// Dispatch succeeds with no observers, and after observers are dropped
#[tokio::test]
async fn test_dropped_observer_does_not_fail_dispatch() {
    let store = test_store();
    store.send(TestAction::Add(1)).await.unwrap();

    let rx = store.subscribe_actions();
    drop(rx);
    store.send(TestAction::Add(1)).await.unwrap();

    assert_eq!(store.state(|s| s.total).await, 2);
}

/// By the time an observer sees an action, its state change is committed
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_observed_action_is_already_reduced() {
    let store = test_store();
    let mut rx = store.subscribe_actions();

    let reader = store.clone();
    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        for _ in 0..10 {
            rx.recv().await.unwrap();
            seen.push(reader.state(|s| s.applied).await);
        }
        seen
    });

    for _ in 0..10 {
        store.send(TestAction::Add(1)).await.unwrap();
    }

    let seen = observer.await.expect("observer panicked");
    for (index, applied) in seen.into_iter().enumerate() {
        assert!(applied > index, "action {index} observed before it was reduced");
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// Listeners are called in registration order
#[tokio::test]
async fn test_listeners_run_in_registration_order() {
    let store = test_store();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        let _subscription = store.subscribe(move |_: &TestState| {
            order.lock().unwrap().push(name);
        });
    }

    store.send(TestAction::Add(1)).await.unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

/// One notification per dispatch, each with the state after that dispatch
#[tokio::test]
async fn test_recording_listener_sees_each_state() {
    let store = test_store();
    let recorder = RecordingListener::<TestState>::new();
    let _subscription = store.subscribe(recorder.listener());

    store.send(TestAction::Add(3)).await.unwrap();
    store.send(TestAction::Add(4)).await.unwrap();
    store.send(TestAction::Reset).await.unwrap();

    let totals: Vec<i64> = recorder.states().iter().map(|s| s.total).collect();
    assert_eq!(totals, vec![3, 7, 0]);
    assert_eq!(recorder.last(), Some(store.snapshot().await));
}

/// A listener registered while a dispatch is notifying starts with the next dispatch
#[tokio::test]
async fn test_listener_added_during_dispatch() {
    let store = test_store();
    let late = RecordingListener::<TestState>::new();
    let registered = Arc::new(AtomicBool::new(false));

    let handle = store.clone();
    let late_listener = late.clone();
    let _subscription = store.subscribe(move |_: &TestState| {
        if !registered.swap(true, Ordering::SeqCst) {
            let _late = handle.subscribe(late_listener.listener());
        }
    });

    store.send(TestAction::Add(1)).await.unwrap();
    assert!(late.is_empty());
    assert_eq!(store.subscriber_count(), 2);

    store.send(TestAction::Add(1)).await.unwrap();
    assert_eq!(late.len(), 1);
    assert_eq!(late.last().map(|s| s.total), Some(2));
}

/// A listener removed while a dispatch is notifying is still called for that dispatch
#[tokio::test]
async fn test_listener_removed_during_dispatch() {
    let store = test_store();
    let target: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
    let calls = Arc::new(AtomicUsize::new(0));

    let handle = store.clone();
    let to_remove = Arc::clone(&target);
    let _remover = store.subscribe(move |_: &TestState| {
        if let Some(id) = to_remove.lock().unwrap().take() {
            handle.unsubscribe(id);
        }
    });

    let counter = Arc::clone(&calls);
    let removed = store.subscribe(move |_: &TestState| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    *target.lock().unwrap() = Some(removed.id());

    store.send(TestAction::Add(1)).await.unwrap();
    store.send(TestAction::Add(1)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.subscriber_count(), 1);
}

/// Concurrent dispatches are fully serialized: no update is lost
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_loses_no_updates() {
    let store = test_store();
    let recorder = RecordingListener::<TestState>::new();
    let _subscription = store.subscribe(recorder.listener());

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.send(TestAction::Add(1)).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("dispatch task panicked").unwrap();
    }

    assert_eq!(store.state(|s| s.total).await, 100);

    let applied: Vec<usize> = recorder.states().iter().map(|s| s.applied).collect();
    assert_eq!(applied, (1..=100).collect::<Vec<_>>());
}
