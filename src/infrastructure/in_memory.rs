//! In-memory repository implementation.
//!
//! Suitable for development and tests. Records live in an ordered map keyed
//! by id, so listing order is ascending id like the `PostgreSQL` backend.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Ids are assigned from a monotonic sequence and never reused
//! - Each operation holds the lock for its whole read-modify-write

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{NewTodo, Todo, TodoId, TodoPatch};
use crate::infrastructure::{
    CreatedTodo, PaginatedResult, Pagination, RepositoryError, RepositoryFuture, TodoMutation,
    TodoRepository,
};

/// Table contents plus the id sequence.
#[derive(Debug)]
struct TodoTable {
    rows: BTreeMap<TodoId, Todo>,
    next_id: i64,
}

impl TodoTable {
    const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn total(&self) -> u64 {
        self.rows.len() as u64
    }
}

/// In-memory implementation of `TodoRepository`.
///
/// # Example
///
/// ```ignore
/// use paged_todos::infrastructure::InMemoryTodoRepository;
///
/// let repository = InMemoryTodoRepository::new();
/// let created = repository.create(NewTodo::new("Buy milk")).await?;
/// let page = repository.list(Pagination::new(1, 10)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryTodoRepository {
    table: Arc<RwLock<TodoTable>>,
}

impl InMemoryTodoRepository {
    /// Creates a new empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(TodoTable::new())),
        }
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl TodoRepository for InMemoryTodoRepository {
    fn list(&self, pagination: Pagination) -> RepositoryFuture<PaginatedResult<Todo>> {
        let table = Arc::clone(&self.table);
        Box::pin(async move {
            let guard = table.read().await;
            let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
            let items: Vec<Todo> = guard
                .rows
                .values()
                .skip(offset)
                .take(pagination.limit as usize)
                .cloned()
                .collect();
            tracing::debug!(
                page = pagination.page,
                limit = pagination.limit,
                returned = items.len(),
                "Listed todos"
            );
            Ok(PaginatedResult::new(items, guard.total(), pagination))
        })
    }

    fn create(&self, todo: NewTodo) -> RepositoryFuture<CreatedTodo> {
        let table = Arc::clone(&self.table);
        Box::pin(async move {
            let mut guard = table.write().await;
            let id = TodoId::new(guard.next_id);
            guard.next_id = guard.next_id.checked_add(1).ok_or_else(|| {
                RepositoryError::DatabaseError("todo id sequence exhausted".to_string())
            })?;
            let created = Todo::new(id, todo.title);
            guard.rows.insert(id, created.clone());
            tracing::debug!(%id, "Created todo");
            Ok(CreatedTodo {
                todo: created,
                total: guard.total(),
            })
        })
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> RepositoryFuture<TodoMutation> {
        let table = Arc::clone(&self.table);
        Box::pin(async move {
            let mut guard = table.write().await;
            let updated = guard.rows.remove(&id).map(|existing| patch.apply(existing));
            if let Some(todo) = &updated {
                guard.rows.insert(id, todo.clone());
                tracing::debug!(%id, "Updated todo");
            } else {
                tracing::debug!(%id, "Update target not found");
            }
            Ok(TodoMutation {
                todo: updated,
                total: guard.total(),
            })
        })
    }

    fn delete(&self, id: TodoId) -> RepositoryFuture<TodoMutation> {
        let table = Arc::clone(&self.table);
        Box::pin(async move {
            let mut guard = table.write().await;
            let removed = guard.rows.remove(&id);
            tracing::debug!(%id, found = removed.is_some(), "Deleted todo");
            Ok(TodoMutation {
                todo: removed,
                total: guard.total(),
            })
        })
    }

    fn count(&self) -> RepositoryFuture<u64> {
        let table = Arc::clone(&self.table);
        Box::pin(async move { Ok(table.read().await.total()) })
    }
}

// =============================================================================
// Tests
// =============================================================================
