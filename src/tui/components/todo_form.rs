//! # TodoForm Component
//!
//! The create/edit card: a single-line Title input, a multi-line Description
//! textarea, a Cancel button and a submit button labelled "Save" in create
//! mode or "Update" in edit mode.
//!
//! The text itself belongs to the core (`App::form`); this component only
//! owns which field has focus and the required-field hint. Keystrokes come
//! out as `FormEvent::Edit` and are applied through `update()`.
//!
//! The cursor always sits at the end of the focused field.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::action::FormEdit;
use crate::core::state::{FormField, TodoForm};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Visible lines of the description textarea.
pub const DESCRIPTION_ROWS: u16 = 4;
/// Total rows of the form card, borders included.
pub const FORM_HEIGHT: u16 = 1 + 3 + 1 + (DESCRIPTION_ROWS + 2) + 1 + 1 + 2;

/// High-level events emitted by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Edit(FormEdit),
    /// Ctrl+S. Required-field validation happens before dispatch.
    Submit,
    /// Esc: clear the form and leave edit mode.
    Cancel,
}

/// Persistent presentation state of the form.
pub struct FormPanelState {
    pub field: FormField,
    /// Shown under the buttons after a blocked submit.
    pub hint: Option<String>,
}

impl FormPanelState {
    pub fn new() -> Self {
        Self {
            field: FormField::Title,
            hint: None,
        }
    }

    /// Records a blocked submit and moves focus to the offending field.
    pub fn require(&mut self, field: FormField) {
        self.field = field;
        self.hint = Some(format!("{} is required", field.label()));
    }
}

impl Default for FormPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for FormPanelState {
    type Event = FormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FormEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.hint = None;
                Some(FormEvent::Edit(FormEdit::Insert(self.field, *c)))
            }
            TuiEvent::Paste(text) => {
                self.hint = None;
                Some(FormEvent::Edit(FormEdit::Paste(self.field, text.clone())))
            }
            TuiEvent::Backspace => Some(FormEvent::Edit(FormEdit::Backspace(self.field))),
            TuiEvent::Enter => match self.field {
                FormField::Title => {
                    self.field = FormField::Description;
                    None
                }
                FormField::Description => {
                    self.hint = None;
                    Some(FormEvent::Edit(FormEdit::Insert(FormField::Description, '\n')))
                }
            },
            TuiEvent::CursorUp => {
                self.field = FormField::Title;
                None
            }
            TuiEvent::CursorDown => {
                self.field = FormField::Description;
                None
            }
            TuiEvent::Submit => Some(FormEvent::Submit),
            TuiEvent::Escape => {
                self.hint = None;
                Some(FormEvent::Cancel)
            }
            _ => None,
        }
    }
}

/// The longest suffix of `text` that fits in `width` columns.
fn tail_fitting(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        used += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }
    &text[start..]
}

/// Wraps the description and returns the lines to show plus the cursor
/// offset (column, row) inside the textarea.
fn description_view(text: &str, width: u16, rows: u16) -> (Vec<String>, (u16, u16)) {
    let width = width.max(1) as usize;
    let options = textwrap::Options::new(width).break_words(true);
    let mut lines: Vec<String> = textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }

    // textwrap drops trailing spaces; the cursor should still move past them.
    let last_raw_line = text.rsplit('\n').next().unwrap_or("");
    let trailing = last_raw_line.len() - last_raw_line.trim_end_matches(' ').len();

    let first_visible = lines.len().saturating_sub(rows as usize);
    let visible = lines.split_off(first_visible);
    let last_width = visible.last().map(|l| l.width()).unwrap_or(0) + trailing;
    let cursor_col = last_width.min(width.saturating_sub(1)) as u16;
    let cursor_row = visible.len().saturating_sub(1) as u16;
    (visible, (cursor_col, cursor_row))
}

/// Transient render wrapper for the form card.
pub struct TodoFormView<'a> {
    form: &'a TodoForm,
    state: &'a FormPanelState,
    editing: bool,
    focused: bool,
}

impl<'a> TodoFormView<'a> {
    pub fn new(form: &'a TodoForm, state: &'a FormPanelState, editing: bool, focused: bool) -> Self {
        Self {
            form,
            state,
            editing,
            focused,
        }
    }

    fn field_block(&self, field: FormField) -> Block<'static> {
        let active = self.focused && self.state.field == field;
        let style = if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::bordered().border_type(BorderType::Rounded).border_style(style)
    }
}

impl Component for TodoFormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let card_title = if self.editing { " Edit Todo " } else { " Add Todo " };
        let card_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(card_style)
            .title(card_title);
        let inner = card.inner(area);
        frame.render_widget(card, area);

        let [title_label, title_area, desc_label, desc_area, buttons_area, hint_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(DESCRIPTION_ROWS + 2),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        let label_style = Style::default().add_modifier(Modifier::BOLD);
        frame.render_widget(Span::styled("Title", label_style), title_label);
        frame.render_widget(Span::styled("Description", label_style), desc_label);

        // Title: single line, scrolled so the end stays visible
        let title_block = self.field_block(FormField::Title);
        let title_inner = title_block.inner(title_area);
        let title_width = title_inner.width.saturating_sub(1) as usize;
        let visible_title = tail_fitting(&self.form.title, title_width);
        let title_widget = if self.form.title.is_empty() {
            Paragraph::new(Span::styled("Enter title", Style::default().fg(Color::DarkGray)))
        } else {
            Paragraph::new(visible_title)
        };
        frame.render_widget(title_widget.block(title_block), title_area);

        // Description: wrapped, showing the last DESCRIPTION_ROWS lines
        let desc_block = self.field_block(FormField::Description);
        let desc_inner = desc_block.inner(desc_area);
        let (desc_lines, (cursor_col, cursor_row)) =
            description_view(&self.form.description, desc_inner.width, desc_inner.height);
        let desc_widget = if self.form.description.is_empty() {
            Paragraph::new(Span::styled(
                "Enter description",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(desc_lines.into_iter().map(Line::from).collect::<Vec<_>>())
        };
        frame.render_widget(desc_widget.block(desc_block), desc_area);

        // Buttons
        let submit_label = if self.editing { " Update " } else { " Save " };
        let buttons = Line::from(vec![
            Span::styled(" Cancel ", Style::default().fg(Color::White).bg(Color::Red)),
            Span::styled(" Esc   ", Style::default().fg(Color::DarkGray)),
            Span::styled(submit_label, Style::default().fg(Color::White).bg(Color::Blue)),
            Span::styled(" Ctrl+S ", Style::default().fg(Color::DarkGray)),
        ])
        .right_aligned();
        frame.render_widget(buttons, buttons_area);

        if let Some(hint) = &self.state.hint {
            frame.render_widget(
                Span::styled(hint.as_str(), Style::default().fg(Color::Red)),
                hint_area,
            );
        }

        if self.focused {
            let position = match self.state.field {
                FormField::Title => Position::new(
                    title_inner.x + visible_title.width().min(title_width) as u16,
                    title_inner.y,
                ),
                FormField::Description => {
                    Position::new(desc_inner.x + cursor_col, desc_inner.y + cursor_row)
                }
            };
            frame.set_cursor_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(form: &TodoForm, state: &FormPanelState, editing: bool) -> String {
        let backend = TestBackend::new(60, FORM_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| TodoFormView::new(form, state, editing, true).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut state = FormPanelState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('a')),
            Some(FormEvent::Edit(FormEdit::Insert(FormField::Title, 'a')))
        );
        // Enter in the title moves on instead of inserting
        assert_eq!(state.handle_event(&TuiEvent::Enter), None);
        assert_eq!(state.field, FormField::Description);
        assert_eq!(
            state.handle_event(&TuiEvent::Enter),
            Some(FormEvent::Edit(FormEdit::Insert(FormField::Description, '\n')))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::Backspace),
            Some(FormEvent::Edit(FormEdit::Backspace(FormField::Description)))
        );
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut state = FormPanelState::new();
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(FormEvent::Submit));
        state.require(FormField::Description);
        assert_eq!(state.hint.as_deref(), Some("Description is required"));
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(FormEvent::Cancel));
        assert!(state.hint.is_none());
    }

    #[test]
    fn test_typing_clears_hint() {
        let mut state = FormPanelState::new();
        state.require(FormField::Title);
        assert_eq!(state.field, FormField::Title);
        state.handle_event(&TuiEvent::InputChar('x'));
        assert!(state.hint.is_none());
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(tail_fitting("hello", 10), "hello");
        assert_eq!(tail_fitting("hello world", 5), "world");
        assert_eq!(tail_fitting("", 5), "");
        // Wide characters count as two columns
        assert_eq!(tail_fitting("日本語", 4), "本語");
    }

    #[test]
    fn test_description_view_keeps_last_rows() {
        let (lines, (col, row)) = description_view("a\nb\nc\nd\ne", 10, 3);
        assert_eq!(lines, vec!["c", "d", "e"]);
        assert_eq!((col, row), (1, 2));
    }

    #[test]
    fn test_description_view_cursor_after_newline_and_spaces() {
        let (lines, cursor) = description_view("first\n", 10, 4);
        assert_eq!(lines, vec!["first", ""]);
        assert_eq!(cursor, (0, 1));

        let (_, cursor) = description_view("ab  ", 10, 4);
        assert_eq!(cursor, (4, 0));

        let (lines, cursor) = description_view("", 10, 4);
        assert_eq!(lines, vec![""]);
        assert_eq!(cursor, (0, 0));
    }

    #[test]
    fn test_render_create_mode() {
        let form = TodoForm::default();
        let text = rendered(&form, &FormPanelState::new(), false);
        assert!(text.contains("Add Todo"));
        assert!(text.contains("Save"));
        assert!(text.contains("Cancel"));
        assert!(!text.contains("Update"));
        assert!(text.contains("Enter title"));
    }

    #[test]
    fn test_render_edit_mode_with_hint() {
        let form = TodoForm {
            title: "Buy milk".to_string(),
            description: String::new(),
        };
        let mut state = FormPanelState::new();
        state.require(FormField::Description);
        let text = rendered(&form, &state, true);
        assert!(text.contains("Edit Todo"));
        assert!(text.contains("Update"));
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Description is required"));
    }
}
