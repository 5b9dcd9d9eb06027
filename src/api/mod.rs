//! # Backend API
//!
//! Everything that touches the REST backend. The rest of the app only sees
//! the [`TodoBackend`] trait, so tests can swap in an in-memory backend.

pub mod backend;
pub mod client;
pub mod types;

pub use backend::{ApiError, TodoBackend};
pub use client::HttpBackend;
pub use types::{Reply, TodoId, TodoItem, TodoPayload};
