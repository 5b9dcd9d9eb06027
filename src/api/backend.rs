use std::fmt;

use async_trait::async_trait;

use super::types::{Reply, TodoId, TodoItem, TodoPayload};

/// Errors that can occur while talking to the todo backend.
///
/// Only `Api` can carry text meant for the user; everything else is shown
/// as the operation's generic failure message and logged in full.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Backend misconfigured (unparseable URL).
    Config(String),
    /// Network-level failure (connection refused, DNS, reset).
    Network(String),
    /// Backend answered with a non-success status.
    /// `message` is whatever `data.message` / `message` the body carried.
    Api {
        status: u16,
        message: Option<String>,
    },
    /// A success response whose body could not be decoded.
    Parse(String),
}

impl ApiError {
    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api {
                status,
                message: Some(message),
            } => write!(f, "API error (HTTP {status}): {message}"),
            ApiError::Api {
                status,
                message: None,
            } => write!(f, "API error (HTTP {status})"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The four CRUD calls against the `/todos` collection.
#[async_trait]
pub trait TodoBackend: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    /// `GET /todos`
    async fn list(&self) -> Result<Reply<Vec<TodoItem>>, ApiError>;

    /// `POST /todos`; the reply carries the created item with its server id.
    async fn create(&self, payload: &TodoPayload) -> Result<Reply<TodoItem>, ApiError>;

    /// `PUT /todos/{id}`; `data` is whatever item the server echoed, if any.
    async fn update(
        &self,
        id: &TodoId,
        payload: &TodoPayload,
    ) -> Result<Reply<Option<TodoItem>>, ApiError>;

    /// `DELETE /todos/{id}`
    async fn delete(&self, id: &TodoId) -> Result<Reply<()>, ApiError>;
}
