//! Data Transfer Objects for API requests and responses.
//!
//! Response envelopes derive both `Serialize` and `Deserialize` so the
//! client transport decodes exactly what the handlers encode.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::domain::{NewTodo, Todo, TodoPatch};
use crate::infrastructure::{CreatedTodo, PaginatedResult, Pagination, TodoMutation};

// =============================================================================
// Query DTOs
// =============================================================================

/// Query parameters for `GET /api/todos`.
///
/// Both values are kept as raw strings so that unparsable input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTodosQuery {
    /// Requested page (1-indexed).
    #[serde(default)]
    pub page: Option<String>,
    /// Requested page size.
    #[serde(default)]
    pub limit: Option<String>,
}

impl ListTodosQuery {
    /// Resolves the query into pagination parameters.
    ///
    /// Absent, unparsable or zero values fall back to page 1 and
    /// `default_limit`. The limit is capped at `max_limit`.
    #[must_use]
    pub fn pagination(&self, default_limit: u32, max_limit: u32) -> Pagination {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(default_limit)
            .min(max_limit);
        Pagination::new(page, limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|parsed| *parsed > 0)
}

// =============================================================================
// Request DTOs
// =============================================================================

/// Request DTO for creating a to-do.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    /// Title of the to-do.
    #[serde(default)]
    pub title: Option<String>,
    /// Accepted for compatibility; new records are always not completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CreateTodoRequest {
    /// Creates a request for the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: Some(false),
        }
    }

    /// Validates the request into a record draft.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the title is absent or blank.
    pub fn validate(&self) -> Result<NewTodo, ValidationError> {
        let title = self
            .title
            .as_deref()
            .ok_or_else(|| ValidationError::single("title", "Title is required"))?;
        validate_title(title).map(NewTodo::new)
    }
}

/// Request DTO for updating a to-do.
///
/// Unknown fields such as an echoed `id` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    /// Validates the request into a patch.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a title is present but blank.
    pub fn validate(&self) -> Result<TodoPatch, ValidationError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        Ok(TodoPatch {
            title,
            completed: self.completed,
        })
    }
}

impl From<&TodoPatch> for UpdateTodoRequest {
    fn from(patch: &TodoPatch) -> Self {
        Self {
            title: patch.title.clone(),
            completed: patch.completed,
        }
    }
}

/// Validates a title, returning it trimmed.
///
/// # Errors
///
/// Returns `ValidationError` if the title is empty after trimming.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::single("title", "Title must not be empty"));
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Response for `GET /api/todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListResponse {
    /// Records on the requested page.
    pub rows: Vec<Todo>,
    /// Total record count.
    pub count: u64,
}

impl From<PaginatedResult<Todo>> for TodoListResponse {
    fn from(result: PaginatedResult<Todo>) -> Self {
        Self {
            rows: result.items,
            count: result.total,
        }
    }
}

/// Response for `POST /api/todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCreatedResponse {
    /// The created record.
    pub todo: Todo,
    /// Total record count after the insert.
    pub count: u64,
}

impl From<CreatedTodo> for TodoCreatedResponse {
    fn from(created: CreatedTodo) -> Self {
        Self {
            todo: created.todo,
            count: created.total,
        }
    }
}

/// Response for `PUT` and `DELETE /api/todos/{id}`.
///
/// `todo` serializes as `null` when the id did not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoMutationResponse {
    /// The affected record, if it existed.
    pub todo: Option<Todo>,
    /// Total record count after the operation.
    pub count: u64,
}

impl From<TodoMutation> for TodoMutationResponse {
    fn from(mutation: TodoMutation) -> Self {
        Self {
            todo: mutation.todo,
            count: mutation.total,
        }
    }
}

/// Response for the counter endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterResponse {
    /// Current counter value.
    pub counter: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoId;
    use rstest::rstest;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListTodosQuery {
        ListTodosQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some("2"), Some("10"), 2, 10)]
    #[case(Some("abc"), Some("xyz"), 1, 10)]
    #[case(Some("0"), Some("0"), 1, 10)]
    #[case(Some("-3"), Some("5"), 1, 5)]
    #[case(Some(" 4 "), Some(""), 4, 10)]
    #[case(Some("1"), Some("5000"), 1, 100)]
    fn test_list_query_pagination(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let pagination = query(page, limit).pagination(10, 100);
        assert_eq!(pagination, Pagination::new(expected_page, expected_limit));
    }

    #[rstest]
    fn test_create_request_requires_title() {
        let request = CreateTodoRequest::default();
        let error = request.validate().unwrap_err();
        assert_eq!(error.errors[0].field, "title");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_create_request_rejects_blank_title(#[case] title: &str) {
        assert!(CreateTodoRequest::new(title).validate().is_err());
    }

    #[rstest]
    fn test_create_request_ignores_completed_flag() {
        let request: CreateTodoRequest =
            serde_json::from_str(r#"{"title":" Buy milk ","completed":true}"#).unwrap();
        let draft = request.validate().unwrap();
        assert_eq!(draft, NewTodo::new("Buy milk"));
    }

    #[rstest]
    fn test_update_request_ignores_unknown_fields() {
        let request: UpdateTodoRequest =
            serde_json::from_str(r#"{"id":4,"title":"Walk dog","completed":true}"#).unwrap();
        let patch = request.validate().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Walk dog"));
        assert_eq!(patch.completed, Some(true));
    }

    #[rstest]
    fn test_update_request_rejects_blank_title() {
        let request = UpdateTodoRequest {
            title: Some(" ".to_string()),
            completed: None,
        };
        assert!(request.validate().is_err());
    }

    #[rstest]
    fn test_mutation_response_serializes_null_todo() {
        let response = TodoMutationResponse {
            todo: None,
            count: 3,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json, serde_json::json!({ "todo": null, "count": 3 }));
    }

    #[rstest]
    fn test_list_response_shape() {
        let response = TodoListResponse {
            rows: vec![Todo::new(TodoId::new(1), "Buy milk")],
            count: 1,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rows": [{ "id": 1, "title": "Buy milk", "completed": false }],
                "count": 1
            })
        );
    }
}
