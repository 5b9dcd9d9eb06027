//! # Core Application Logic
//!
//! The todo client's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect::Request
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │  ── runs requests ──▶    │    API     │
//!     │  Adapter   │  ◀── Action::Listed ──   │  backend   │
//!     │ (ratatui)  │       Created, ...       │ (reqwest)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all client state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod state;
