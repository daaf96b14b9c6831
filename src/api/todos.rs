//! HTTP handlers for the to-do store.
//!
//! Every mutation answers with the affected record and the total record
//! count after the operation, so the client can recompute its page count
//! without issuing another request.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{
    CreateTodoRequest, ListTodosQuery, TodoCreatedResponse, TodoListResponse,
    TodoMutationResponse, UpdateTodoRequest,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::TodoId;

// =============================================================================
// GET /api/todos
// =============================================================================

/// Lists one page of to-dos.
///
/// # Query Parameters
///
/// - `page`: Page number (default: 1)
/// - `limit`: Items per page (default: configured page size, max: 100)
///
/// Absent or unparsable values fall back to the defaults. A page past the
/// end returns no rows and the current count.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] with **500** if the repository fails.
pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<TodoListResponse>, ApiErrorResponse> {
    let pagination =
        query.pagination(state.config.default_page_size, state.config.max_page_size);

    let result = state.todo_repository.list(pagination).await?;

    Ok(Json(TodoListResponse::from(result)))
}

// =============================================================================
// POST /api/todos
// =============================================================================

/// Creates a to-do.
///
/// # Request Body
///
/// ```json
/// { "title": "Buy milk", "completed": false }
/// ```
///
/// `completed` is ignored; new records always start not completed.
///
/// # Response
///
/// - **201 Created**: `{ "todo": Todo, "count": n }`
///
/// # Errors
///
/// - **400 Bad Request**: Malformed body, or absent or blank title
/// - **500 Internal Server Error**: Repository operation failed
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoCreatedResponse>), ApiErrorResponse> {
    let Json(request) = body?;
    let draft = request.validate()?;

    let created = state.todo_repository.create(draft).await?;
    tracing::info!(id = %created.todo.id, count = created.total, "Todo created");

    Ok((StatusCode::CREATED, Json(TodoCreatedResponse::from(created))))
}

// =============================================================================
// PUT /api/todos/{id}
// =============================================================================

/// Applies a partial update to a to-do.
///
/// # Request Body
///
/// Any subset of `{ "title": string, "completed": bool }`. Other fields are
/// ignored.
///
/// # Response
///
/// - **200 OK**: `{ "todo": Todo | null, "count": n }`; `null` when the id
///   does not exist
///
/// # Errors
///
/// - **400 Bad Request**: Malformed body or blank title
/// - **500 Internal Server Error**: Repository operation failed
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoMutationResponse>, ApiErrorResponse> {
    let Json(request) = body?;
    let patch = request.validate()?;
    let id = TodoId::new(id);

    let mutation = state.todo_repository.update(id, patch).await?;
    if mutation.todo.is_none() {
        tracing::debug!(%id, "Update for unknown todo");
    }

    Ok(Json(TodoMutationResponse::from(mutation)))
}

// =============================================================================
// DELETE /api/todos/{id}
// =============================================================================

/// Deletes a to-do.
///
/// # Response
///
/// - **200 OK**: `{ "todo": Todo | null, "count": n }`; `todo` holds the
///   removed record, or `null` when the id does not exist
///
/// # Errors
///
/// - **500 Internal Server Error**: Repository operation failed
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TodoMutationResponse>, ApiErrorResponse> {
    let id = TodoId::new(id);

    let mutation = state.todo_repository.delete(id).await?;
    if mutation.todo.is_some() {
        tracing::info!(%id, count = mutation.total, "Todo deleted");
    }

    Ok(Json(TodoMutationResponse::from(mutation)))
}
