//! # StatusBanner Component
//!
//! The transient success (green) / error (red) message under the form.
//! Renders nothing when there is no status; the layout gives it no rows then.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::state::{StatusKind, StatusMessage};
use crate::tui::component::Component;

/// Rows the banner occupies when visible (one text line plus borders).
pub const BANNER_HEIGHT: u16 = 3;

pub struct StatusBanner<'a> {
    pub status: Option<&'a StatusMessage>,
}

impl<'a> StatusBanner<'a> {
    pub fn new(status: Option<&'a StatusMessage>) -> Self {
        Self { status }
    }

    pub fn height(&self) -> u16 {
        if self.status.is_some() { BANNER_HEIGHT } else { 0 }
    }
}

fn kind_style(kind: StatusKind) -> (Style, &'static str) {
    match kind {
        StatusKind::Success => (Style::default().fg(Color::Green), " Success "),
        StatusKind::Error => (Style::default().fg(Color::Red), " Error "),
    }
}

impl Component for StatusBanner<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(status) = self.status else {
            return;
        };
        let (style, title) = kind_style(status.kind);

        let line = Line::from(vec![
            Span::styled(
                status.set_at.format("%H:%M:%S ").to_string(),
                style.add_modifier(Modifier::DIM),
            ),
            Span::styled(status.text.as_str(), style.add_modifier(Modifier::BOLD)),
        ]);

        let banner = Paragraph::new(line)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(style)
                    .title(title),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(banner, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn message(kind: StatusKind, text: &str) -> StatusMessage {
        StatusMessage {
            kind,
            text: text.to_string(),
            set_at: Local::now(),
        }
    }

    #[test]
    fn test_height_depends_on_status() {
        let status = message(StatusKind::Success, "ok");
        assert_eq!(StatusBanner::new(None).height(), 0);
        assert_eq!(StatusBanner::new(Some(&status)).height(), BANNER_HEIGHT);
    }

    #[test]
    fn test_error_banner_is_red() {
        let status = message(StatusKind::Error, "bad request");
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| StatusBanner::new(Some(&status)).render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("bad request"));
        assert!(text.contains("Error"));
        // Top-left border cell carries the error colour
        assert_eq!(buffer[(0, 0)].fg, Color::Red);
    }

    #[test]
    fn test_success_banner_is_green() {
        let status = message(StatusKind::Success, "Todo created");
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| StatusBanner::new(Some(&status)).render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("Todo created"));
        assert_eq!(buffer[(0, 0)].fg, Color::Green);
    }
}
