//! # TitleBar Component
//!
//! Top line showing the app name, how many todos are listed, the form mode
//! and whether requests are outstanding.
//!
//! Purely presentational: it receives all data as props and has no internal
//! state.
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.items.len(), app.editing_id.clone(), app.in_flight);
//! title_bar.render(frame, area);
//! ```
//!
//! Rendered text, depending on state:
//!
//! 1. `"Todo APP | 3 todos | Editing #2 | syncing…"`
//! 2. `"Todo APP | 3 todos | Editing #2"`
//! 3. `"Todo APP | 3 todos"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::api::TodoId;
use crate::tui::component::Component;

pub struct TitleBar {
    pub item_count: usize,
    /// Id of the item the form is editing (None = create mode)
    pub editing: Option<TodoId>,
    pub in_flight: usize,
}

impl TitleBar {
    pub fn new(item_count: usize, editing: Option<TodoId>, in_flight: usize) -> Self {
        Self {
            item_count,
            editing,
            in_flight,
        }
    }

    fn text(&self) -> String {
        let noun = if self.item_count == 1 { "todo" } else { "todos" };
        let mut text = format!("Todo APP | {} {}", self.item_count, noun);
        if let Some(id) = &self.editing {
            text.push_str(&format!(" | Editing #{id}"));
        }
        if self.in_flight > 0 {
            text.push_str(" | syncing…");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ))
        .centered();
        frame.render_widget(line, area);
    }
}
