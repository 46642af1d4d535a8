//! Derived views over the to-do state.
//!
//! Selectors are read-only: they borrow from the state and never change it.

use crate::error::TodoError;
use crate::types::{AppState, Todo, VisibilityFilter};

/// Todos visible under `filter`, in list order
#[must_use]
pub fn visible_todos(todos: &[Todo], filter: VisibilityFilter) -> Vec<&Todo> {
    todos
        .iter()
        .filter(|todo| filter.matches(todo.completed))
        .collect()
}

/// Todos visible under a filter given by name
///
/// Accepts the names [`VisibilityFilter`] parses (`SHOW_ACTIVE`, `active`, ...).
///
/// # Errors
///
/// Returns [`TodoError::InvalidFilter`] if `name` is not a known filter.
pub fn visible_todos_by_name<'a>(
    todos: &'a [Todo],
    name: &str,
) -> Result<Vec<&'a Todo>, TodoError> {
    let filter: VisibilityFilter = name.parse()?;
    Ok(visible_todos(todos, filter))
}

/// Todos visible under the state's current filter
#[must_use]
pub fn select_visible_todos(state: &AppState) -> Vec<&Todo> {
    visible_todos(&state.todos, state.visibility_filter)
}

/// Number of todos not yet completed
#[must_use]
pub fn active_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}

/// Number of completed todos
#[must_use]
pub fn completed_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| todo.completed).count()
}

/// Whether `filter` is the one currently selected
///
/// Filter buttons use this to render the selected filter as disabled.
#[must_use]
pub fn is_filter_active(state: &AppState, filter: VisibilityFilter) -> bool {
    state.visibility_filter == filter
}
