//! Counter controller.

use super::transport::{ClientError, TodoApi};
use super::window::{LoadStatus, NETWORK_ERROR_MESSAGE};
use crate::api::CounterResponse;

/// Holds the last counter value reported by the server.
#[derive(Debug)]
pub struct CounterController<A> {
    api: A,
    value: u64,
    status: LoadStatus,
}

impl<A: TodoApi> CounterController<A> {
    /// Creates an idle controller showing zero until the first response.
    pub fn new(api: A) -> Self {
        Self {
            api,
            value: 0,
            status: LoadStatus::Idle,
        }
    }

    /// Returns the last value reported by the server.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the status of the last request.
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Fetches the current value.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the status is set to `error`.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.status = LoadStatus::Loading;
        let result = self.api.counter().await;
        self.apply(result)
    }

    /// Increments the server counter and stores the returned value.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the status is set to `error`.
    pub async fn increment(&mut self) -> Result<(), ClientError> {
        self.status = LoadStatus::Loading;
        let result = self.api.increment().await;
        self.apply(result)
    }

    fn apply(&mut self, result: Result<CounterResponse, ClientError>) -> Result<(), ClientError> {
        match result {
            Ok(response) => {
                self.value = response.counter;
                self.status = LoadStatus::Idle;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "Counter request failed");
                self.status = LoadStatus::Error(NETWORK_ERROR_MESSAGE.to_string());
                Err(error)
            }
        }
    }
}
