//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, Reply, TodoBackend, TodoId, TodoItem, TodoPayload};
use crate::core::state::{App, Behavior};

/// Creates a test App with default behavior.
pub fn test_app() -> App {
    App::new(Behavior::default())
}

pub fn item(id: i64, title: &str, description: &str) -> TodoItem {
    TodoItem {
        id: TodoId::Int(id),
        title: title.to_string(),
        description: description.to_string(),
    }
}

/// Backend keeping todos in a Vec, answering the way the real server does.
/// With `fail_with` set, every call fails with that error instead.
pub struct InMemoryBackend {
    items: Mutex<Vec<TodoItem>>,
    next_id: Mutex<i64>,
    fail_with: Option<ApiError>,
}

impl InMemoryBackend {
    pub fn new(items: Vec<TodoItem>) -> Self {
        Self {
            items: Mutex::new(items),
            next_id: Mutex::new(100),
            fail_with: None,
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new(Vec::new())
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Api {
            status: 404,
            message: Some("Todo not found".to_string()),
        }
    }
}

#[async_trait]
impl TodoBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Reply<Vec<TodoItem>>, ApiError> {
        self.check()?;
        Ok(Reply {
            data: self.items.lock().unwrap().clone(),
            message: Some("Todos fetched".to_string()),
        })
    }

    async fn create(&self, payload: &TodoPayload) -> Result<Reply<TodoItem>, ApiError> {
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        let created = TodoItem {
            id: TodoId::Int(*next_id),
            title: payload.title.clone(),
            description: payload.description.clone(),
        };
        *next_id += 1;
        self.items.lock().unwrap().push(created.clone());
        Ok(Reply {
            data: created,
            message: Some("Todo created".to_string()),
        })
    }

    async fn update(
        &self,
        id: &TodoId,
        payload: &TodoPayload,
    ) -> Result<Reply<Option<TodoItem>>, ApiError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(Self::not_found)?;
        item.title = payload.title.clone();
        item.description = payload.description.clone();
        Ok(Reply {
            data: Some(item.clone()),
            message: Some("Todo updated".to_string()),
        })
    }

    async fn delete(&self, id: &TodoId) -> Result<Reply<()>, ApiError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(Self::not_found());
        }
        Ok(Reply {
            data: (),
            message: Some("Todo deleted".to_string()),
        })
    }
}
