//! # Application State
//!
//! The one in-memory record the client keeps. No persistence, no TUI types.
//!
//! ```text
//! App
//! ├── items: Vec<TodoItem>            // server order, unique ids
//! ├── form: TodoForm                  // pending title/description
//! ├── editing_id: Option<TodoId>      // None = create mode
//! ├── status: Option<StatusMessage>   // transient success/error banner
//! ├── status_generation: u64          // tags the pending auto-clear
//! ├── in_flight: usize                // outstanding requests
//! └── behavior: Behavior              // configurable reconciliation rules
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::api::{TodoId, TodoItem, TodoPayload};
use crate::core::config::ResolvedConfig;

/// The two inputs of the create/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
}

impl TodoForm {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    /// First required field that is blank, if any. Both fields are required.
    pub fn missing_field(&self) -> Option<FormField> {
        if self.title.trim().is_empty() {
            Some(FormField::Title)
        } else if self.description.trim().is_empty() {
            Some(FormField::Description)
        } else {
            None
        }
    }

    pub fn payload(&self) -> TodoPayload {
        TodoPayload {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub set_at: DateTime<Local>,
}

/// Which title/description win when an update succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    /// The values the user submitted.
    #[default]
    Form,
    /// The item echoed back in the response, when the server sends one.
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    pub update_source: UpdateSource,
    /// Leave edit mode when the item being edited is deleted.
    pub cancel_edit_on_delete: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            update_source: UpdateSource::Form,
            cancel_edit_on_delete: true,
        }
    }
}

pub struct App {
    pub items: Vec<TodoItem>,
    pub form: TodoForm,
    /// Present while the form edits an existing item.
    pub editing_id: Option<TodoId>,
    pub status: Option<StatusMessage>,
    /// Bumped on every status change; a clear only applies to its own generation.
    pub status_generation: u64,
    pub in_flight: usize,
    pub behavior: Behavior,
}

impl App {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            items: Vec::new(),
            form: TodoForm::default(),
            editing_id: None,
            status: None,
            status_generation: 0,
            in_flight: 0,
            behavior,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.behavior)
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Replaces the status message and returns the generation its clear timer must carry.
    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) -> u64 {
        self.status_generation += 1;
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
            set_at: Local::now(),
        });
        self.status_generation
    }

    /// Back to create mode with an empty form.
    pub fn reset_form(&mut self) {
        self.form.clear();
        self.editing_id = None;
    }
}
