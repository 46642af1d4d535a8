//! Reducer logic for the to-do list.
//!
//! Each slice of [`AppState`] has its own reducer:
//!
//! - [`TodosReducer`] owns `todos`
//! - [`VisibilityFilterReducer`] owns `visibility_filter`
//!
//! [`AppReducer`] scopes both to their field and combines them. Every action
//! reaches both slice reducers; each ignores the actions it does not handle.

use crate::types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};
use tidy_core::{combine_reducers, reducer::Reducer, scope_reducer, CombinedReducer};

/// Environment dependencies for the to-do reducers
///
/// The reducers are pure and need nothing injected.
pub type TodoEnvironment = ();

/// Reducer for the list of todos
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl TodosReducer {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Id for the next added todo: one past the largest id, or 0 when empty
    ///
    /// `None` once the largest id is `u64::MAX`; ids are never reused.
    #[must_use]
    pub fn next_id(todos: &[Todo]) -> Option<TodoId> {
        match todos.iter().map(|todo| todo.id).max() {
            Some(max) => max.next(),
            None => Some(TodoId::FIRST),
        }
    }

    fn add(todos: &[Todo], text: &str) -> Vec<Todo> {
        let Some(id) = Self::next_id(todos) else {
            tracing::warn!(len = todos.len(), "Add ignored: todo ids exhausted");
            return todos.to_vec();
        };
        tracing::debug!(%id, "Adding todo");

        let mut next = Vec::with_capacity(todos.len() + 1);
        next.extend_from_slice(todos);
        next.push(Todo::new(id, text));
        next
    }

    fn toggle(todos: &[Todo], id: TodoId) -> Vec<Todo> {
        if !todos.iter().any(|todo| todo.id == id) {
            tracing::debug!(%id, "Toggle ignored: no todo with this id");
            return todos.to_vec();
        }

        todos
            .iter()
            .map(|todo| {
                if todo.id == id {
                    todo.toggled()
                } else {
                    todo.clone()
                }
            })
            .collect()
    }
}

impl Reducer for TodosReducer {
    type State = Vec<Todo>;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        todos: &Self::State,
        action: &Self::Action,
        _env: &Self::Environment,
    ) -> Self::State {
        match action {
            TodoAction::AddTodo { text } => Self::add(todos, text),
            TodoAction::ToggleTodo { id } => Self::toggle(todos, *id),
            TodoAction::SetVisibilityFilter { .. } => todos.clone(),
        }
    }
}

/// Reducer for the visibility filter
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityFilterReducer;

impl VisibilityFilterReducer {
    /// Creates a new `VisibilityFilterReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for VisibilityFilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        current: &Self::State,
        action: &Self::Action,
        _env: &Self::Environment,
    ) -> Self::State {
        match action {
            TodoAction::SetVisibilityFilter { filter } => *filter,
            TodoAction::AddTodo { .. } | TodoAction::ToggleTodo { .. } => *current,
        }
    }
}

/// Root reducer: both slice reducers, each scoped to its field of [`AppState`]
#[derive(Debug)]
pub struct AppReducer {
    combined: CombinedReducer<AppState, TodoAction, TodoEnvironment>,
}

impl AppReducer {
    /// Creates the root reducer
    #[must_use]
    pub fn new() -> Self {
        let combined = combine_reducers(vec![
            Box::new(scope_reducer(
                TodosReducer::new(),
                |state: &AppState| &state.todos,
                |state: &mut AppState, todos| state.todos = todos,
            )),
            Box::new(scope_reducer(
                VisibilityFilterReducer::new(),
                |state: &AppState| &state.visibility_filter,
                |state: &mut AppState, filter| state.visibility_filter = filter,
            )),
        ]);

        Self { combined }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
        env: &Self::Environment,
    ) -> Self::State {
        self.combined.reduce(state, action, env)
    }
}
