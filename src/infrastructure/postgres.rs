//! `PostgreSQL` repository implementation.
//!
//! Uses `sqlx` with a connection pool. Each store operation is a single
//! statement followed by a count query, which gives per-row atomicity for
//! update and delete without cross-row transactions.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE todos (
//!     id BIGSERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use sqlx::PgPool;

use crate::domain::{NewTodo, Todo, TodoId, TodoPatch};
use crate::infrastructure::{
    CreatedTodo, PaginatedResult, Pagination, RepositoryError, RepositoryFuture, TodoMutation,
    TodoRepository,
};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS todos";

/// Row shape shared by every query that returns a record.
type TodoRow = (i64, String, bool);

fn row_to_todo((id, title, completed): TodoRow) -> Todo {
    Todo {
        id: TodoId::new(id),
        title,
        completed,
    }
}

fn database_error(error: &sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

async fn count_rows(pool: &PgPool) -> Result<u64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
        .fetch_one(pool)
        .await
        .map_err(|error| database_error(&error))?;

    u64::try_from(count)
        .map_err(|_| RepositoryError::CorruptRecord(format!("negative row count {count}")))
}

/// `PostgreSQL` implementation of `TodoRepository`.
///
/// # Example
///
/// ```ignore
/// use paged_todos::infrastructure::PostgresTodoRepository;
///
/// let pool = PgPool::connect("postgres://localhost/todos").await?;
/// let repository = PostgresTodoRepository::new(pool);
/// repository.ensure_schema(false).await?;
/// let created = repository.create(NewTodo::new("Buy milk")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Creates a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `todos` table if it does not exist.
    ///
    /// With `reset` the table is dropped first, discarding all records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::SchemaError` if a DDL statement fails.
    pub async fn ensure_schema(&self, reset: bool) -> Result<(), RepositoryError> {
        if reset {
            tracing::warn!("Dropping todos table");
            sqlx::query(DROP_TABLE_SQL)
                .execute(&self.pool)
                .await
                .map_err(|error| RepositoryError::SchemaError(error.to_string()))?;
        }

        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|error| RepositoryError::SchemaError(error.to_string()))?;

        tracing::info!(reset, "Todos schema ready");
        Ok(())
    }
}

impl TodoRepository for PostgresTodoRepository {
    fn list(&self, pagination: Pagination) -> RepositoryFuture<PaginatedResult<Todo>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let total = count_rows(&pool).await?;

            if total == 0 {
                return Ok(PaginatedResult::new(vec![], 0, pagination));
            }

            let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
            let limit = i64::from(pagination.limit);

            let rows: Vec<TodoRow> = sqlx::query_as(
                "SELECT id, title, completed FROM todos ORDER BY id ASC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            let items: Vec<Todo> = rows.into_iter().map(row_to_todo).collect();
            tracing::debug!(
                page = pagination.page,
                limit = pagination.limit,
                returned = items.len(),
                total,
                "Listed todos"
            );
            Ok(PaginatedResult::new(items, total, pagination))
        })
    }

    fn create(&self, todo: NewTodo) -> RepositoryFuture<CreatedTodo> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let row: TodoRow = sqlx::query_as(
                "INSERT INTO todos (title, completed) VALUES ($1, FALSE) \
                 RETURNING id, title, completed",
            )
            .bind(&todo.title)
            .fetch_one(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            let created = row_to_todo(row);
            let total = count_rows(&pool).await?;
            tracing::debug!(id = %created.id, total, "Created todo");
            Ok(CreatedTodo {
                todo: created,
                total,
            })
        })
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> RepositoryFuture<TodoMutation> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let row: Option<TodoRow> = sqlx::query_as(
                "UPDATE todos SET \
                     title = COALESCE($2, title), \
                     completed = COALESCE($3, completed), \
                     updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING id, title, completed",
            )
            .bind(id.value())
            .bind(patch.title)
            .bind(patch.completed)
            .fetch_optional(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            let total = count_rows(&pool).await?;
            tracing::debug!(%id, found = row.is_some(), "Updated todo");
            Ok(TodoMutation {
                todo: row.map(row_to_todo),
                total,
            })
        })
    }

    fn delete(&self, id: TodoId) -> RepositoryFuture<TodoMutation> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let row: Option<TodoRow> =
                sqlx::query_as("DELETE FROM todos WHERE id = $1 RETURNING id, title, completed")
                    .bind(id.value())
                    .fetch_optional(&pool)
                    .await
                    .map_err(|error| database_error(&error))?;

            let total = count_rows(&pool).await?;
            tracing::debug!(%id, found = row.is_some(), "Deleted todo");
            Ok(TodoMutation {
                todo: row.map(row_to_todo),
                total,
            })
        })
    }

    fn count(&self) -> RepositoryFuture<u64> {
        let pool = self.pool.clone();
        Box::pin(async move { count_rows(&pool).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_row_to_todo() {
        let todo = row_to_todo((5, "Write report".to_string(), true));
        assert_eq!(todo.id, TodoId::new(5));
        assert_eq!(todo.title, "Write report");
        assert!(todo.completed);
    }
}
