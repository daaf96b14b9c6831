//! Router assembly.

use axum::{
    Router,
    routing::{get, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::counter::{get_counter, increment_counter};
use super::handlers::{AppState, health_check};
use super::todos::{create_todo, delete_todo, list_todos, update_todo};

/// Builds the application router with request tracing and open CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/counter", get(get_counter))
        .route("/api/counter/increment", get(increment_counter))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
