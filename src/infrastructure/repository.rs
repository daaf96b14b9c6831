//! Repository trait for to-do records.
//!
//! Every operation returns a boxed `'static` future so the trait stays
//! object-safe and implementations can be selected at runtime behind an
//! `Arc<dyn TodoRepository>`.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{NewTodo, Todo, TodoId, TodoPatch};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
///
/// A missing record is not an error; update and delete report it through
/// [`TodoMutation::todo`] being `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Database query or connection error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Schema creation or reset failed.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A stored row could not be converted into a record.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Future returned by repository operations.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Pagination
// =============================================================================

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl Pagination {
    /// Creates pagination parameters, raising zero values to 1.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Returns the offset for database queries: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * (self.limit as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Paginated result containing items and total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl<T> PaginatedResult<T> {
    /// Creates a new paginated result.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

// =============================================================================
// Mutation Results
// =============================================================================

/// Result of creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTodo {
    /// The newly persisted record.
    pub todo: Todo,
    /// Total record count after the insert.
    pub total: u64,
}

/// Result of updating or deleting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoMutation {
    /// The affected record, or `None` if the id did not exist.
    ///
    /// For deletes this is the last-known value of the removed record.
    pub todo: Option<Todo>,
    /// Total record count after the operation.
    pub total: u64,
}

// =============================================================================
// Todo Repository
// =============================================================================

/// Repository trait for to-do records.
///
/// All operations are immediately visible to subsequent calls.
pub trait TodoRepository: Send + Sync {
    /// Lists records ordered by ascending id.
    ///
    /// A page past the end yields no items and the correct total.
    fn list(&self, pagination: Pagination) -> RepositoryFuture<PaginatedResult<Todo>>;

    /// Persists a new record with a freshly assigned id.
    fn create(&self, todo: NewTodo) -> RepositoryFuture<CreatedTodo>;

    /// Applies a patch to the record with the given id.
    fn update(&self, id: TodoId, patch: TodoPatch) -> RepositoryFuture<TodoMutation>;

    /// Removes the record with the given id.
    fn delete(&self, id: TodoId) -> RepositoryFuture<TodoMutation>;

    /// Counts all records.
    fn count(&self) -> RepositoryFuture<u64>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 20, 40)]
    fn test_pagination_offset(#[case] page: u32, #[case] limit: u32, #[case] expected: u64) {
        assert_eq!(Pagination::new(page, limit).offset(), expected);
    }

    #[rstest]
    fn test_pagination_offset_does_not_overflow() {
        let pagination = Pagination::new(u32::MAX, u32::MAX);
        assert_eq!(
            pagination.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(0, 25, 1, 25)]
    #[case(4, 0, 4, 1)]
    #[case(4, 25, 4, 25)]
    fn test_pagination_new_raises_zero(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let pagination = Pagination::new(page, limit);
        assert_eq!(pagination.page, expected_page);
        assert_eq!(pagination.limit, expected_limit);
    }

    #[rstest]
    fn test_pagination_default() {
        assert_eq!(Pagination::default(), Pagination::new(1, 10));
    }

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");

        let error = RepositoryError::SchemaError("permission denied".to_string());
        assert_eq!(format!("{error}"), "Schema error: permission denied");
    }
}
