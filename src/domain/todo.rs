//! To-do domain model.
//!
//! A to-do record is identified by a server-assigned integer id. The id is
//! immutable once assigned; title and completion flag are mutated in place
//! through a [`TodoPatch`].

use serde::{Deserialize, Serialize};

/// Largest number of records a single list request returns.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a to-do record.
///
/// Assigned by the store on creation. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a `TodoId` from a raw integer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// =============================================================================
// Todo
// =============================================================================

/// A persisted to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier.
    pub id: TodoId,
    /// Text of the to-do.
    pub title: String,
    /// Whether the to-do has been completed.
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed to-do.
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Data for a record that has not been persisted yet.
///
/// New records always start out not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Text of the to-do.
    pub title: String,
}

impl NewTodo {
    /// Creates a new record draft.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Partial update for an existing record.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// A patch that only sets the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Applies the patch, returning the updated record.
    #[must_use]
    pub fn apply(&self, todo: Todo) -> Todo {
        Todo {
            id: todo.id,
            title: self.title.clone().unwrap_or(todo.title),
            completed: self.completed.unwrap_or(todo.completed),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
