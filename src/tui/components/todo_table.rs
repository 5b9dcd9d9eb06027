//! # Todo Table Component
//!
//! The "Todo List" card: one row per item with its position, title,
//! shortened description and the row actions.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TodoTableState` lives in `TuiState` (selection, delete confirmation)
//! - `TodoTable` is created each frame with borrowed items and state
//!
//! Deleting takes two presses of `d` on the same item. Any other key disarms
//! it, and so does the armed item leaving the selected row.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Cell, Paragraph, Row, Table, TableState};

use crate::api::{TodoId, TodoItem};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Shortens a description for display: the first `max_chars` characters
/// followed by `...` when it is longer. The stored text is never touched.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Events emitted by the table. `Edit` indices point into `App::items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Edit(usize),
    /// Confirmed delete of the item that was armed by the first press.
    Delete(TodoId),
    Quit,
}

/// Persistent state for the table.
pub struct TodoTableState {
    pub selected: usize,
    /// Item armed by the first `d` press.
    pub confirm_delete: Option<TodoId>,
    pub table_state: TableState,
    /// Row ids (prop, synced from `App::items` every frame)
    ids: Vec<TodoId>,
}

impl TodoTableState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            confirm_delete: None,
            table_state: TableState::default(),
            ids: Vec::new(),
        }
    }

    /// Keeps the selection inside the list after it changed, and disarms a
    /// pending delete whose item is no longer on the selected row.
    pub fn sync_rows(&mut self, items: &[TodoItem]) {
        self.ids = items.iter().map(|item| item.id.clone()).collect();
        if self.ids.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(self.ids.len() - 1);
            self.table_state.select(Some(self.selected));
        }
        if self.confirm_delete.is_some() && self.confirm_delete.as_ref() != self.selected_id() {
            self.confirm_delete = None;
        }
    }

    fn selected_id(&self) -> Option<&TodoId> {
        self.ids.get(self.selected)
    }
}

impl Default for TodoTableState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for TodoTableState {
    type Event = TableEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TableEvent> {
        let is_delete_key = matches!(event, TuiEvent::InputChar('d'));
        if !is_delete_key {
            self.confirm_delete = None;
        }
        let len = self.ids.len();

        match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => Some(TableEvent::Quit),
            TuiEvent::CursorUp => {
                if len > 0 {
                    self.selected = self.selected.saturating_sub(1);
                    self.table_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                    self.table_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::InputChar('e') | TuiEvent::Enter => {
                (len > 0).then_some(TableEvent::Edit(self.selected))
            }
            TuiEvent::InputChar('d') => {
                let selected = self.selected_id()?.clone();
                match self.confirm_delete.take() {
                    Some(armed) if armed == selected => Some(TableEvent::Delete(armed)),
                    _ => {
                        self.confirm_delete = Some(selected);
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the table.
pub struct TodoTable<'a> {
    items: &'a [TodoItem],
    state: &'a mut TodoTableState,
    preview_chars: usize,
    focused: bool,
}

impl<'a> TodoTable<'a> {
    pub fn new(
        items: &'a [TodoItem],
        state: &'a mut TodoTableState,
        preview_chars: usize,
        focused: bool,
    ) -> Self {
        Self {
            items,
            state,
            preview_chars,
            focused,
        }
    }

    fn action_text(&self, index: usize) -> &'static str {
        if !self.focused || index != self.state.selected {
            ""
        } else if self.state.confirm_delete.is_some() {
            "d again to delete"
        } else {
            "[e] Edit  [d] Delete"
        }
    }
}

impl Component for TodoTable<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync_rows(self.items);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Todo List ")
            .title_bottom(Line::from(" ↑↓ Select  e Edit  d Delete  Tab Form  q Quit ").centered());

        if self.items.is_empty() {
            let empty = Paragraph::new("No todos yet.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(vec!["SL#", "Title", "Description", "Action"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let description =
                    truncate_description(&item.description, self.preview_chars).replace('\n', " ");
                let action_style = if self.state.confirm_delete.is_some() {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(item.title.clone()),
                    Cell::from(description),
                    Cell::from(self.action_text(i)).style(action_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Percentage(25),
            Constraint::Fill(1),
            Constraint::Length(20),
        ];

        let highlight = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(highlight);

        frame.render_stateful_widget(table, area, &mut self.state.table_state);
    }
}
