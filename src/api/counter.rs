//! Counter endpoints.
//!
//! Both endpoints wait for the configured delay before answering to
//! simulate network latency.

use axum::{Json, extract::State};

use super::dto::CounterResponse;
use super::handlers::AppState;

/// `GET /api/counter` - returns the current counter value.
pub async fn get_counter(State(state): State<AppState>) -> Json<CounterResponse> {
    tokio::time::sleep(state.config.counter_delay).await;
    Json(CounterResponse {
        counter: state.counter.current(),
    })
}

/// `GET /api/counter/increment` - increments, waits, then returns the new value.
pub async fn increment_counter(State(state): State<AppState>) -> Json<CounterResponse> {
    let counter = state.counter.increment();
    tracing::debug!(counter, "Counter incremented");
    tokio::time::sleep(state.config.counter_delay).await;
    Json(CounterResponse { counter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::AppConfig;
    use crate::infrastructure::InMemoryTodoRepository;
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;

    fn state_with_delay(delay: Duration) -> AppState {
        AppState::with_config(
            Arc::new(InMemoryTodoRepository::new()),
            AppConfig {
                counter_delay: delay,
                ..AppConfig::default()
            },
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_get_counter_starts_at_zero() {
        let state = state_with_delay(Duration::ZERO);
        let Json(response) = get_counter(State(state)).await;
        assert_eq!(response.counter, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_increment_then_get() {
        let state = state_with_delay(Duration::ZERO);

        let Json(first) = increment_counter(State(state.clone())).await;
        let Json(second) = increment_counter(State(state.clone())).await;
        let Json(current) = get_counter(State(state)).await;

        assert_eq!(first.counter, 1);
        assert_eq!(second.counter, 2);
        assert_eq!(current.counter, 2);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_counter_waits_for_configured_delay() {
        let state = state_with_delay(Duration::from_millis(500));
        let started = tokio::time::Instant::now();

        let Json(response) = increment_counter(State(state)).await;

        assert_eq!(response.counter, 1);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
