//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Ctrl+S? That's `Action::Submit`.
//! Backend answers a create? That's `Action::Created(result)`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the runtime has to carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Every backend round-trip is two actions: the user action returns
//! `Effect::Request`, and the completion action (carrying the backend's
//! `Result`) returns `Effect::ArmStatusTimer` for the message it just set.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::api::{ApiError, Reply, TodoId, TodoItem, TodoPayload};
use crate::core::state::{App, FormField, StatusKind, UpdateSource};

const LIST_OK: &str = "Todos loaded";
const LIST_FAILED: &str = "Failed to load todos";
const CREATE_OK: &str = "Todo created";
const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_OK: &str = "Todo updated";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_OK: &str = "Todo deleted";
const DELETE_FAILED: &str = "Failed to delete todo";

/// Keystroke-level edits to the form. The cursor always sits at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Insert(FormField, char),
    Paste(FormField, String),
    Backspace(FormField),
}

/// A backend call the runtime must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(TodoPayload),
    Update { id: TodoId, payload: TodoPayload },
    Delete(TodoId),
}

#[derive(Debug)]
pub enum Action {
    /// Issued once when the UI comes up.
    Startup,
    Quit,
    Form(FormEdit),
    /// Create or update, depending on whether edit mode is active right now.
    Submit,
    BeginEdit(TodoItem),
    CancelEdit,
    Delete(TodoId),

    Listed(Result<Reply<Vec<TodoItem>>, ApiError>),
    Created(Result<Reply<TodoItem>, ApiError>),
    /// `id` and `payload` are the values captured at submit time.
    Updated {
        id: TodoId,
        payload: TodoPayload,
        result: Result<Reply<Option<TodoItem>>, ApiError>,
    },
    Deleted {
        id: TodoId,
        result: Result<Reply<()>, ApiError>,
    },

    /// The auto-clear timer armed for `generation` fired.
    StatusExpired(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Request(Request),
    /// Start (or restart) the status auto-clear for this generation.
    ArmStatusTimer(u64),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Startup => request(app, Request::List),
        Action::Quit => Effect::Quit,
        Action::Form(edit) => {
            apply_form_edit(app, edit);
            Effect::None
        }
        Action::Submit => {
            let payload = app.form.payload();
            match app.editing_id.clone() {
                Some(id) => request(app, Request::Update { id, payload }),
                None => request(app, Request::Create(payload)),
            }
        }
        Action::BeginEdit(item) => {
            if app.position(&item.id).is_none() {
                warn!("Ignoring edit of unknown todo {}", item.id);
                return Effect::None;
            }
            debug!("Editing todo {}", item.id);
            app.form.title = item.title;
            app.form.description = item.description;
            app.editing_id = Some(item.id);
            Effect::None
        }
        Action::CancelEdit => {
            app.reset_form();
            Effect::None
        }
        Action::Delete(id) => request(app, Request::Delete(id)),

        Action::Listed(result) => {
            finish_request(app);
            match result {
                Ok(reply) => {
                    app.items = dedupe_by_id(reply.data);
                    info!("Loaded {} todos", app.items.len());
                    succeed(app, reply.message, LIST_OK)
                }
                Err(e) => fail(app, &e, LIST_FAILED),
            }
        }
        Action::Created(result) => {
            finish_request(app);
            match result {
                Ok(reply) => {
                    let created = reply.data;
                    info!("Created todo {}", created.id);
                    match app.position(&created.id) {
                        Some(index) => {
                            warn!("Created todo {} was already listed, replacing", created.id);
                            app.items[index] = created;
                        }
                        None => app.items.push(created),
                    }
                    app.form.clear();
                    succeed(app, reply.message, CREATE_OK)
                }
                Err(e) => fail(app, &e, CREATE_FAILED),
            }
        }
        Action::Updated {
            id,
            payload,
            result,
        } => {
            finish_request(app);
            match result {
                Ok(reply) => {
                    let (title, description) = match (app.behavior.update_source, reply.data) {
                        (UpdateSource::Server, Some(echo)) => (echo.title, echo.description),
                        _ => (payload.title, payload.description),
                    };
                    match app.items.iter_mut().find(|item| item.id == id) {
                        Some(item) => {
                            item.title = title;
                            item.description = description;
                            info!("Updated todo {}", id);
                        }
                        None => warn!("Updated todo {} is no longer listed", id),
                    }
                    app.reset_form();
                    succeed(app, reply.message, UPDATE_OK)
                }
                Err(e) => fail(app, &e, UPDATE_FAILED),
            }
        }
        Action::Deleted { id, result } => {
            finish_request(app);
            match result {
                Ok(reply) => {
                    app.items.retain(|item| item.id != id);
                    info!("Deleted todo {}", id);
                    if app.behavior.cancel_edit_on_delete && app.editing_id.as_ref() == Some(&id) {
                        debug!("Deleted todo {} was being edited, leaving edit mode", id);
                        app.reset_form();
                    }
                    succeed(app, reply.message, DELETE_OK)
                }
                Err(e) => fail(app, &e, DELETE_FAILED),
            }
        }

        Action::StatusExpired(generation) => {
            if generation == app.status_generation {
                debug!("Status message expired (generation {})", generation);
                app.status = None;
            } else {
                debug!(
                    "Ignoring stale status clear (generation {}, current {})",
                    generation, app.status_generation
                );
            }
            Effect::None
        }
    }
}

fn request(app: &mut App, request: Request) -> Effect {
    app.in_flight += 1;
    debug!("Requesting {:?} ({} in flight)", request, app.in_flight);
    Effect::Request(request)
}

fn finish_request(app: &mut App) {
    app.in_flight = app.in_flight.saturating_sub(1);
}

fn succeed(app: &mut App, message: Option<String>, fallback: &str) -> Effect {
    let text = message.unwrap_or_else(|| fallback.to_string());
    Effect::ArmStatusTimer(app.set_status(StatusKind::Success, text))
}

fn fail(app: &mut App, error: &ApiError, fallback: &str) -> Effect {
    warn!("{}: {}", fallback, error);
    let text = error.server_message().unwrap_or(fallback).to_string();
    Effect::ArmStatusTimer(app.set_status(StatusKind::Error, text))
}

fn apply_form_edit(app: &mut App, edit: FormEdit) {
    match edit {
        FormEdit::Insert(FormField::Title, '\n') => {}
        FormEdit::Insert(field, c) => app.form.field_mut(field).push(c),
        FormEdit::Paste(FormField::Title, text) => {
            // Title is a single line
            let line = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
            app.form.title.push_str(&line);
        }
        FormEdit::Paste(FormField::Description, text) => {
            app.form.description.push_str(&text.replace("\r\n", "\n"));
        }
        FormEdit::Backspace(field) => {
            app.form.field_mut(field).pop();
        }
    }
}

/// Keeps the first occurrence of every id.
fn dedupe_by_id(items: Vec<TodoItem>) -> Vec<TodoItem> {
    let mut seen = HashSet::new();
    let before = items.len();
    let unique: Vec<TodoItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect();
    if unique.len() != before {
        warn!("Dropped {} todos with duplicate ids", before - unique.len());
    }
    unique
}
