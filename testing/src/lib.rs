//! # Tidy Testing
//!
//! Testing utilities and helpers for the Tidy architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`RecordingListener`]: a store listener that records every state it sees
//! - [`properties`]: algebraic checks for reducers (idempotence, involution)
//!
//! ## Example
//!
//! ```ignore
//! use tidy_testing::RecordingListener;
//!
//! #[tokio::test]
//! async fn test_add_flow() {
//!     let store = todo::new_store();
//!     let recorder = RecordingListener::new();
//!     let _subscription = store.subscribe(recorder.listener());
//!
//!     store.send(TodoAction::AddTodo { text: "buy milk".into() }).await?;
//!
//!     assert_eq!(recorder.len(), 1);
//! }
//! ```


pub use reducer_test::ReducerTest;

/// Mock collaborators for store tests
pub mod mocks {
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records every state a store listener is notified with
    ///
    /// Clones share the same recording, so one clone can be handed to the
    /// store while the test keeps another for assertions.
    ///
    /// # Example
    ///
    /// ```
    /// use tidy_testing::mocks::RecordingListener;
    ///
    /// let recorder = RecordingListener::<u32>::new();
    /// let listener = recorder.listener();
    ///
    /// listener(&1);
    /// listener(&2);
    /// assert_eq!(recorder.states(), vec![1, 2]);
    /// assert_eq!(recorder.last(), Some(2));
    /// ```
    #[derive(Debug)]
    pub struct RecordingListener<S> {
        states: Arc<Mutex<Vec<S>>>,
    }

    impl<S> RecordingListener<S>
    where
        S: Clone + Send + 'static,
    {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self {
                states: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// A listener closure to pass to `Store::subscribe`
        #[must_use]
        pub fn listener(&self) -> impl Fn(&S) + Send + Sync + 'static {
            let states = Arc::clone(&self.states);
            move |state: &S| {
                states
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(state.clone());
            }
        }

        /// Every recorded state, oldest first
        #[must_use]
        pub fn states(&self) -> Vec<S> {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// The most recently recorded state
        #[must_use]
        pub fn last(&self) -> Option<S> {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of notifications received
        #[must_use]
        pub fn len(&self) -> usize {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether no notification was received
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl<S> Clone for RecordingListener<S> {
        fn clone(&self) -> Self {
            Self {
                states: Arc::clone(&self.states),
            }
        }
    }

    impl<S> Default for RecordingListener<S>
    where
        S: Clone + Send + 'static,
    {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Algebraic properties of reducers
///
/// Each check runs the reducer and reports whether the property held, so it
/// can be used inside `assert!` or `prop_assert!`.
pub mod properties {
    use tidy_core::reducer::Reducer;

    /// Applying `action` twice gives the same state as applying it once
    pub fn is_idempotent<R>(
        reducer: &R,
        state: &R::State,
        action: &R::Action,
        env: &R::Environment,
    ) -> bool
    where
        R: Reducer,
        R::State: PartialEq,
    {
        let once = reducer.reduce(state, action, env);
        let twice = reducer.reduce(&once, action, env);
        once == twice
    }

    /// Applying `action` twice gives back the original state
    pub fn is_involution<R>(
        reducer: &R,
        state: &R::State,
        action: &R::Action,
        env: &R::Environment,
    ) -> bool
    where
        R: Reducer,
        R::State: PartialEq,
    {
        let once = reducer.reduce(state, action, env);
        let twice = reducer.reduce(&once, action, env);
        &twice == state
    }

    /// `action` leaves the state as it was
    pub fn is_noop<R>(
        reducer: &R,
        state: &R::State,
        action: &R::Action,
        env: &R::Environment,
    ) -> bool
    where
        R: Reducer,
        R::State: PartialEq,
    {
        &reducer.reduce(state, action, env) == state
    }
}

pub use mocks::RecordingListener;
