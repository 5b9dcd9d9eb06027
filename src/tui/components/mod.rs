//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, item count, form mode, syncing indicator
//! - `StatusBanner`: the transient success/error message
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `TodoFormView` + `FormPanelState`: the create/edit card
//! - `TodoTable` + `TodoTableState`: the todo list with row actions
//!
//! Stateful components keep their presentation state in `TuiState` and are
//! wrapped each frame around borrowed data, so the core state stays the one
//! source of truth:
//!
//! ```rust,ignore
//! TodoTable::new(&app.items, &mut tui.table, preview_chars, focused).render(frame, area);
//! ```

mod status_banner;
mod title_bar;
pub mod todo_form;
pub mod todo_table;

pub use status_banner::StatusBanner;
pub use title_bar::TitleBar;
pub use todo_form::{FORM_HEIGHT, FormEvent, FormPanelState, TodoFormView};
pub use todo_table::{TableEvent, TodoTable, TodoTableState, truncate_description};
