//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a subset of state
//!
//! The usual shape of an application is a root state made of independent
//! slices, each owned by one small reducer. Scope every slice reducer to its
//! field, then combine the scoped reducers into the root reducer.
//!
//! # Examples
//!
//! ```
//! use tidy_core::{combine_reducers, scope_reducer, Reducer};
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! enum AppAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! struct CountReducer;
//! struct NameReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = i32;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, count: &i32, action: &AppAction, _env: &()) -> i32 {
//!         match action {
//!             AppAction::Increment => count + 1,
//!             AppAction::SetName(_) => *count,
//!         }
//!     }
//! }
//!
//! impl Reducer for NameReducer {
//!     type State = String;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, name: &String, action: &AppAction, _env: &()) -> String {
//!         match action {
//!             AppAction::SetName(new_name) => new_name.clone(),
//!             AppAction::Increment => name.clone(),
//!         }
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     Box::new(scope_reducer(CountReducer, |s: &AppState| &s.count, |s, c| s.count = c)),
//!     Box::new(scope_reducer(NameReducer, |s: &AppState| &s.name, |s, n| s.name = n)),
//! ]);
//!
//! let state = root.reduce(&AppState::default(), &AppAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

use crate::reducer::Reducer;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence; the state produced by one is the input of
/// the next. With zero reducers the combined reducer returns a clone of its
/// input.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
///
/// # Examples
///
/// ```
/// use tidy_core::{combine_reducers, Reducer};
///
/// struct Double;
/// struct AddOne;
///
/// impl Reducer for Double {
///     type State = i32;
///     type Action = ();
///     type Environment = ();
///
///     fn reduce(&self, state: &i32, _action: &(), _env: &()) -> i32 {
///         state * 2
///     }
/// }
///
/// impl Reducer for AddOne {
///     type State = i32;
///     type Action = ();
///     type Environment = ();
///
///     fn reduce(&self, state: &i32, _action: &(), _env: &()) -> i32 {
///         state + 1
///     }
/// }
///
/// let combined = combine_reducers(vec![Box::new(Double), Box::new(AddOne)]);
/// assert_eq!(combined.reduce(&3, &(), &()), 7);
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: 'static,
    E: 'static,
{
    /// Number of reducers in this combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether this combination contains no reducers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> std::fmt::Debug for CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: 'static,
    E: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: Clone + 'static,
    A: 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
        env: &Self::Environment,
    ) -> Self::State {
        self.reducers
            .iter()
            .fold(state.clone(), |current, reducer| {
                reducer.reduce(&current, action, env)
            })
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// This allows you to reuse reducers designed for smaller state types
/// within a larger application state.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The child state type (subset of `S`)
/// - `A`: The action type
/// - `E`: The environment type
///
/// # Examples
///
/// ```
/// use tidy_core::{scope_reducer, Reducer};
///
/// enum CounterAction {
///     Increment,
///     Decrement,
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = i32;
///     type Action = CounterAction;
///     type Environment = ();
///
///     fn reduce(&self, count: &i32, action: &CounterAction, _env: &()) -> i32 {
///         match action {
///             CounterAction::Increment => count + 1,
///             CounterAction::Decrement => count - 1,
///         }
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: i32,
///     other_data: String,
/// }
///
/// let scoped = scope_reducer(
///     CounterReducer,
///     |app_state: &AppState| &app_state.counter,
///     |app_state: &mut AppState, counter: i32| {
///         app_state.counter = counter;
///     },
/// );
///
/// let state = scoped.reduce(&AppState::default(), &CounterAction::Increment, &());
/// assert_eq!(state.counter, 1);
/// ```
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<fn() -> (A, E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
        env: &Self::Environment,
    ) -> Self::State {
        let next_sub_state = self.reducer.reduce((self.get_state)(state), action, env);

        // Write the updated slice into a copy of the parent
        let mut next = state.clone();
        (self.set_state)(&mut next, next_sub_state);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = i32;
        type Action = TestAction;
        type Environment = ();

        fn reduce(&self, counter: &i32, action: &TestAction, _env: &()) -> i32 {
            match action {
                TestAction::Increment => counter + 1,
                TestAction::Decrement => counter - 1,
                TestAction::SetName(_) => *counter,
            }
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = String;
        type Action = TestAction;
        type Environment = ();

        fn reduce(&self, name: &String, action: &TestAction, _env: &()) -> String {
            if let TestAction::SetName(new_name) = action {
                new_name.clone()
            } else {
                name.clone()
            }
        }
    }

    fn root_reducer() -> CombinedReducer<TestState, TestAction, ()> {
        combine_reducers(vec![
            Box::new(scope_reducer(
                CounterReducer,
                |s: &TestState| &s.counter,
                |s, counter| s.counter = counter,
            )),
            Box::new(scope_reducer(
                NameReducer,
                |s: &TestState| &s.name,
                |s, name| s.name = name,
            )),
        ])
    }

    #[test]
    fn test_combine_reducers() {
        let combined = root_reducer();
        assert_eq!(combined.len(), 2);

        let state = TestState::default();

        let state = combined.reduce(&state, &TestAction::Increment, &());
        assert_eq!(state.counter, 1);

        let state = combined.reduce(&state, &TestAction::SetName("Alice".to_string()), &());
        assert_eq!(state.name, "Alice");

        let state = combined.reduce(&state, &TestAction::Decrement, &());
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_empty_is_identity() {
        let combined: CombinedReducer<TestState, TestAction, ()> = combine_reducers(vec![]);
        assert!(combined.is_empty());

        let state = TestState {
            counter: 3,
            name: "x".to_string(),
        };
        assert_eq!(combined.reduce(&state, &TestAction::Increment, &()), state);
    }

    #[test]
    fn test_scope_reducer_leaves_input_and_siblings_untouched() {
        let scoped = scope_reducer(
            CounterReducer,
            |parent: &TestState| &parent.counter,
            |parent: &mut TestState, counter| parent.counter = counter,
        );

        let before = TestState {
            counter: 5,
            name: "test".to_string(),
        };

        let after = scoped.reduce(&before, &TestAction::Increment, &());
        assert_eq!(after.counter, 6);
        assert_eq!(after.name, "test");

        // Input is never mutated
        assert_eq!(before.counter, 5);
    }

    proptest! {
        #[test]
        fn combined_matches_slice_by_slice(steps in proptest::collection::vec(0u8..3, 0..32)) {
            let combined = root_reducer();
            let mut state = TestState::default();
            let mut expected_counter = 0;
            let mut expected_name = String::new();

            for step in steps {
                let action = match step {
                    0 => TestAction::Increment,
                    1 => TestAction::Decrement,
                    _ => TestAction::SetName(format!("n{expected_counter}")),
                };
                expected_counter = CounterReducer.reduce(&expected_counter, &action, &());
                expected_name = NameReducer.reduce(&expected_name, &action, &());
                state = combined.reduce(&state, &action, &());
            }

            prop_assert_eq!(state.counter, expected_counter);
            prop_assert_eq!(state.name, expected_name);
        }
    }
}
