//! reqwest implementation of [`TodoBackend`].
//!
//! The configured URL is the collection itself (e.g. `http://localhost:5000/todos`);
//! item URLs are built by appending the id as one encoded path segment.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::backend::{ApiError, TodoBackend};
use super::types::{Envelope, Reply, TodoId, TodoItem, TodoPayload, error_message};

/// Todo backend reached over HTTP/JSON.
pub struct HttpBackend {
    collection: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(collection_url: &str) -> Result<Self, ApiError> {
        let trimmed = collection_url.trim_end_matches('/');
        let collection = Url::parse(trimmed)
            .map_err(|e| ApiError::Config(format!("invalid API URL '{collection_url}': {e}")))?;
        if collection.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "API URL '{collection_url}' cannot hold item paths"
            )));
        }

        Ok(Self {
            collection,
            client: reqwest::Client::new(),
        })
    }

    pub fn collection_url(&self) -> &str {
        self.collection.as_str()
    }

    fn item_url(&self, id: &TodoId) -> Url {
        let mut url = self.collection.clone();
        // cannot_be_a_base() was rejected in new(), so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Sends the request and returns the raw body of a 2xx response.
    /// Non-2xx statuses become `ApiError::Api` with the body's message, if any.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("Backend response status: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            warn!("Backend error: {} - {}", status, body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Like [`decode`], but an empty body (e.g. `204 No Content`) is an empty envelope.
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Envelope {
            data: None,
            message: None,
        });
    }
    decode(body)
}

#[async_trait]
impl TodoBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn list(&self) -> Result<Reply<Vec<TodoItem>>, ApiError> {
        info!("GET {}", self.collection);
        let body = self.send(self.client.get(self.collection.clone())).await?;
        let envelope: Envelope<Vec<TodoItem>> = decode(&body)?;
        let data = envelope
            .data
            .ok_or_else(|| ApiError::Parse("list response has no data".to_string()))?;
        info!("Fetched {} todos", data.len());
        Ok(Reply {
            data,
            message: envelope.message,
        })
    }

    async fn create(&self, payload: &TodoPayload) -> Result<Reply<TodoItem>, ApiError> {
        info!("POST {} (title={:?})", self.collection, payload.title);
        let body = self
            .send(self.client.post(self.collection.clone()).json(payload))
            .await?;
        let envelope: Envelope<TodoItem> = decode(&body)?;
        let data = envelope
            .data
            .ok_or_else(|| ApiError::Parse("create response has no data".to_string()))?;
        Ok(Reply {
            data,
            message: envelope.message,
        })
    }

    async fn update(
        &self,
        id: &TodoId,
        payload: &TodoPayload,
    ) -> Result<Reply<Option<TodoItem>>, ApiError> {
        let url = self.item_url(id);
        info!("PUT {}", url);
        let body = self.send(self.client.put(url).json(payload)).await?;
        // Backends echo all sorts of things here (the row, a count, nothing);
        // only a well-formed item is kept.
        let envelope: Envelope<serde_json::Value> = decode_optional(&body)?;
        let data = envelope
            .data
            .and_then(|value| serde_json::from_value::<TodoItem>(value).ok());
        Ok(Reply {
            data,
            message: envelope.message,
        })
    }

    async fn delete(&self, id: &TodoId) -> Result<Reply<()>, ApiError> {
        let url = self.item_url(id);
        info!("DELETE {}", url);
        let body = self.send(self.client.delete(url)).await?;
        let envelope: Envelope<serde_json::Value> = decode_optional(&body)?;
        Ok(Reply {
            data: (),
            message: envelope.message,
        })
    }
}
