//! A to-do list built on the Tidy reducer/store architecture.
//!
//! The whole application state is one [`AppState`]: the list of todos and
//! the selected [`VisibilityFilter`]. It only changes when a [`TodoAction`]
//! is dispatched to the store, which runs it through [`AppReducer`].
//!
//! - [`types`]: state, actions, ids, filters
//! - [`reducer`]: slice reducers and the combined root reducer
//! - [`selectors`]: derived read-only views (visible todos, counts)
//! - [`error`]: [`TodoError`]
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{new_store, select_visible_todos, TodoAction, TodoId, VisibilityFilter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = new_store();
//!
//! store.send(TodoAction::AddTodo { text: "buy milk".to_string() }).await?;
//! store.send(TodoAction::AddTodo { text: "walk dog".to_string() }).await?;
//! store.send(TodoAction::ToggleTodo { id: TodoId::FIRST }).await?;
//! store
//!     .send(TodoAction::SetVisibilityFilter { filter: VisibilityFilter::Active })
//!     .await?;
//!
//! let visible: Vec<String> = store
//!     .state(|s| {
//!         select_visible_todos(s)
//!             .into_iter()
//!             .map(|todo| todo.text.clone())
//!             .collect()
//!     })
//!     .await;
//! assert_eq!(visible, vec!["walk dog".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod reducer;
pub mod selectors;
pub mod types;

use tidy_runtime::{Store, StoreConfig};

// Re-export commonly used types
pub use error::TodoError;
pub use reducer::{AppReducer, TodoEnvironment, TodosReducer, VisibilityFilterReducer};
pub use selectors::{
    active_count, completed_count, is_filter_active, select_visible_todos, visible_todos,
    visible_todos_by_name,
};
pub use types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};

/// The store type for the to-do application
pub type TodoStore = Store<AppState, TodoAction, TodoEnvironment, AppReducer>;

/// Creates a store holding the initial state: no todos, `All` filter
#[must_use]
pub fn new_store() -> TodoStore {
    new_store_with_config(StoreConfig::default())
}

/// Creates a store with a custom [`StoreConfig`]
#[must_use]
pub fn new_store_with_config(config: StoreConfig) -> TodoStore {
    Store::with_config(AppState::new(), AppReducer::new(), (), config)
}
