//! HTTP transport used by the client controllers.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::api::{
    CounterResponse, CreateTodoRequest, TodoCreatedResponse, TodoListResponse,
    TodoMutationResponse, UpdateTodoRequest,
};
use crate::domain::{TodoId, TodoPatch};

/// Errors raised while talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, timeout or unreadable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with {status} ({code})")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// `code` of the error envelope, or `UNKNOWN` if the body has none.
        code: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The requested record is not part of the current page window.
    #[error("todo {0} is not on the current page")]
    NotInWindow(TodoId),
}

/// Future returned by [`TodoApi`] methods.
pub type ClientFuture<'a, T> = BoxFuture<'a, Result<T, ClientError>>;

/// Server operations the controllers depend on.
pub trait TodoApi: Send + Sync {
    /// `GET /api/todos?page=&limit=`
    fn list(&self, page: u32, limit: u32) -> ClientFuture<'_, TodoListResponse>;

    /// `POST /api/todos`
    fn create(&self, title: String) -> ClientFuture<'_, TodoCreatedResponse>;

    /// `PUT /api/todos/{id}`
    fn update(&self, id: TodoId, patch: TodoPatch) -> ClientFuture<'_, TodoMutationResponse>;

    /// `DELETE /api/todos/{id}`
    fn delete(&self, id: TodoId) -> ClientFuture<'_, TodoMutationResponse>;

    /// `GET /api/counter`
    fn counter(&self) -> ClientFuture<'_, CounterResponse>;

    /// `GET /api/counter/increment`
    fn increment(&self) -> ClientFuture<'_, CounterResponse>;
}

/// [`TodoApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Creates a transport without a request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a transport with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        parse_response(response).await
    }

    async fn send_json<T, B>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }
}

impl TodoApi for HttpTodoApi {
    fn list(&self, page: u32, limit: u32) -> ClientFuture<'_, TodoListResponse> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("/api/todos"))
                .query(&[("page", page), ("limit", limit)])
                .send()
                .await?;
            parse_response::<TodoListResponse>(response).await
        })
    }

    fn create(&self, title: String) -> ClientFuture<'_, TodoCreatedResponse> {
        Box::pin(async move {
            let request = CreateTodoRequest::new(title);
            self.send_json::<TodoCreatedResponse, _>(reqwest::Method::POST, "/api/todos", &request)
                .await
        })
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> ClientFuture<'_, TodoMutationResponse> {
        Box::pin(async move {
            let request = UpdateTodoRequest::from(&patch);
            let path = format!("/api/todos/{id}");
            self.send_json::<TodoMutationResponse, _>(reqwest::Method::PUT, &path, &request)
                .await
        })
    }

    fn delete(&self, id: TodoId) -> ClientFuture<'_, TodoMutationResponse> {
        Box::pin(async move {
            let response = self
                .client
                .delete(self.url(&format!("/api/todos/{id}")))
                .send()
                .await?;
            parse_response::<TodoMutationResponse>(response).await
        })
    }

    fn counter(&self) -> ClientFuture<'_, CounterResponse> {
        Box::pin(async move { self.get::<CounterResponse>("/api/counter").await })
    }

    fn increment(&self) -> ClientFuture<'_, CounterResponse> {
        Box::pin(async move { self.get::<CounterResponse>("/api/counter/increment").await })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        serde_json::from_slice(&body).map_err(|error| ClientError::Decode(error.to_string()))
    } else {
        let code = serde_json::from_slice::<ErrorBody>(&body)
            .map_or_else(|_| "UNKNOWN".to_string(), |error| error.code);
        Err(ClientError::Status { status, code })
    }
}
