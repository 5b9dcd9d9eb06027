use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a todo.
///
/// Backends disagree on whether ids are numbers or strings, so both are
/// accepted and sent back exactly as received. The client never mints one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum TodoId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Int(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TodoId {
    fn from(n: i64) -> Self {
        TodoId::Int(n)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        TodoId::Text(s.to_string())
    }
}

/// One persisted task record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Some backends store an unset description as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for both create (`POST`) and update (`PUT`).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TodoPayload {
    pub title: String,
    pub description: String,
}

/// Success body as the backend sends it: `{data, message}`, both optional on the wire.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

/// A decoded success response, handed from the backend to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub message: Option<String>,
}

/// Pulls the human-readable message out of an error body.
///
/// Looks at `data.message` first, then a top-level `message`. Anything else
/// (non-JSON, missing field, non-string value) yields `None` so the caller
/// can substitute a generic text.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("data")
        .and_then(|data| data.get("message"))
        .and_then(|m| m.as_str())
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
}
