//! Domain types for the to-do list.
//!
//! The whole application state is one [`AppState`] value: the list of
//! [`Todo`] items and the [`VisibilityFilter`] currently selected. It only
//! changes in response to a [`TodoAction`].

use crate::error::TodoError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tidy_macros::Action;

/// Unique identifier for a todo item
///
/// Ids are assigned by the todos reducer, starting at 0, and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// The id given to the first item of an empty list
    pub const FIRST: Self = Self(0);

    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` past `u64::MAX`
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Text entered by the user, stored verbatim
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Returns a copy with `completed` inverted
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Which todos are visible
///
/// Wire names follow the action payloads (`SHOW_ALL`, `SHOW_ACTIVE`,
/// `SHOW_COMPLETED`). Parsing also accepts the short forms `all`, `active`
/// and `completed` in any case; anything else is
/// [`TodoError::InvalidFilter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    #[serde(rename = "SHOW_ALL")]
    All,
    /// Todos that are not completed
    #[serde(rename = "SHOW_ACTIVE")]
    Active,
    /// Completed todos
    #[serde(rename = "SHOW_COMPLETED")]
    Completed,
}

impl VisibilityFilter {
    /// Every filter, in the order filter buttons are shown
    pub const ALL_FILTERS: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Wire name (`SHOW_ALL`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "SHOW_ALL",
            Self::Active => "SHOW_ACTIVE",
            Self::Completed => "SHOW_COMPLETED",
        }
    }

    /// Human-readable button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether a todo with this completion status is visible under the filter
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

impl std::fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHOW_ALL" | "ALL" => Ok(Self::All),
            "SHOW_ACTIVE" | "ACTIVE" => Ok(Self::Active),
            "SHOW_COMPLETED" | "COMPLETED" => Ok(Self::Completed),
            _ => Err(TodoError::InvalidFilter(s.to_string())),
        }
    }
}

impl TryFrom<String> for VisibilityFilter {
    type Error = TodoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Everything that can happen to the to-do list
///
/// Serialized with an internal `type` tag, so an action looks like
/// `{"type":"ADD_TODO","text":"buy milk"}`. [`TodoAction::action_type`]
/// returns the same tag.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a new todo with the given text
    AddTodo {
        /// Text of the todo
        text: String,
    },

    /// Invert the `completed` flag of a todo
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Select which todos are visible
    SetVisibilityFilter {
        /// New filter
        filter: VisibilityFilter,
    },
}

/// Application state
///
/// Owned by the store; readers get snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todos in insertion order (newest last)
    pub todos: Vec<Todo>,
    /// Currently selected filter
    pub visibility_filter: VisibilityFilter,
}

impl AppState {
    /// Creates the initial state: no todos, `All` filter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}
