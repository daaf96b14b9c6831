//! HTTP API layer.
//!
//! - [`todos`]: paginated to-do store endpoints
//! - [`counter`]: process counter endpoints
//! - [`routes`]: router assembly

pub mod counter;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod todos;

pub use counter::{get_counter, increment_counter};
pub use dto::{
    CounterResponse, CreateTodoRequest, ListTodosQuery, TodoCreatedResponse, TodoListResponse,
    TodoMutationResponse, UpdateTodoRequest,
};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{AppConfig, AppState, HealthResponse, health_check};
pub use routes::create_router;
pub use todos::{create_todo, delete_todo, list_todos, update_todo};
