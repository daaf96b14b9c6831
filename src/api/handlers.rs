//! Application state and shared handlers.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;

use crate::domain::{MAX_PAGE_SIZE, ProcessCounter};
use crate::infrastructure::{ConfigurationError, TodoRepository};

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration for runtime settings.
///
/// # Environment Variables
///
/// - `DEFAULT_PAGE_SIZE`: page size when `limit` is absent (default: `10`)
/// - `COUNTER_DELAY_MS`: artificial latency of the counter endpoints (default: `500`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Page size used when a list request carries no usable `limit`.
    pub default_page_size: u32,
    /// Upper bound on `limit`.
    pub max_page_size: u32,
    /// Delay applied before answering counter requests.
    pub counter_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: MAX_PAGE_SIZE,
            counter_delay: Duration::from_millis(500),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidNumber` if a variable is not a
    /// valid integer or the page size is zero.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read_number = |key: &str| -> Result<Option<u64>, ConfigurationError> {
            let Some(raw) = lookup(key) else {
                return Ok(None);
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigurationError::InvalidNumber {
                    key: key.to_string(),
                    value: trimmed.to_string(),
                })
        };

        let default_page_size = match read_number("DEFAULT_PAGE_SIZE")? {
            None => defaults.default_page_size,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|size| (1..=defaults.max_page_size).contains(size))
                .ok_or_else(|| ConfigurationError::InvalidNumber {
                    key: "DEFAULT_PAGE_SIZE".to_string(),
                    value: value.to_string(),
                })?,
        };

        let counter_delay = read_number("COUNTER_DELAY_MS")?
            .map_or(defaults.counter_delay, Duration::from_millis);

        Ok(Self {
            default_page_size,
            max_page_size: defaults.max_page_size,
            counter_delay,
        })
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The counter is process-lifetime state: it starts at zero, is lost on
/// restart and is not shared between server instances.
#[derive(Clone)]
pub struct AppState {
    /// To-do repository for persistence.
    pub todo_repository: Arc<dyn TodoRepository>,
    /// In-memory counter.
    pub counter: Arc<ProcessCounter>,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Creates a new `AppState` with a fresh counter and default configuration.
    #[must_use]
    pub fn new(todo_repository: Arc<dyn TodoRepository>) -> Self {
        Self::with_config(todo_repository, AppConfig::default())
    }

    /// Creates a new `AppState` with custom configuration.
    #[must_use]
    pub fn with_config(todo_repository: Arc<dyn TodoRepository>, config: AppConfig) -> Self {
        Self {
            todo_repository,
            counter: Arc::new(ProcessCounter::new()),
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("todo_repository", &"Arc<dyn TodoRepository>")
            .field("counter", &self.counter.current())
            .field("config", &self.config)
            .finish()
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
