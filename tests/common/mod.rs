//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use paged_todos::api::{AppConfig, AppState, create_router};
use paged_todos::domain::{NewTodo, Todo};
use paged_todos::infrastructure::{InMemoryTodoRepository, TodoRepository};

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Configuration with no counter latency.
pub fn test_config() -> AppConfig {
    AppConfig {
        counter_delay: Duration::ZERO,
        ..AppConfig::default()
    }
}

/// Creates a test `AppState` backed by an empty in-memory repository.
pub fn create_test_app_state() -> AppState {
    AppState::with_config(Arc::new(InMemoryTodoRepository::new()), test_config())
}

/// Creates a test `AppState` whose counter endpoints wait for `delay`.
pub fn create_app_state_with_counter_delay(delay: Duration) -> AppState {
    let config = AppConfig {
        counter_delay: delay,
        ..AppConfig::default()
    };
    AppState::with_config(Arc::new(InMemoryTodoRepository::new()), config)
}

/// Creates `count` records titled `todo 1`..`todo N` and returns them.
pub async fn seed_todos(state: &AppState, count: usize) -> Vec<Todo> {
    let mut created = Vec::with_capacity(count);
    for index in 1..=count {
        let result = state
            .todo_repository
            .create(NewTodo::new(format!("todo {index}")))
            .await
            .expect("seeding should succeed");
        created.push(result.todo);
    }
    created
}

// =============================================================================
// Server Helpers
// =============================================================================

/// A server bound to an ephemeral localhost port.
pub struct TestServer {
    pub address: SocketAddr,
    pub state: AppState,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }
}

/// Serves the router for `state` in a background task.
pub async fn spawn_server(state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    let router = create_router(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });

    TestServer { address, state }
}

/// Returns an address nothing listens on.
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    listener.local_addr().expect("local address")
}
