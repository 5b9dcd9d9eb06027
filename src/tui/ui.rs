use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{FORM_HEIGHT, StatusBanner, TitleBar, TodoFormView, TodoTable};
use crate::tui::{Focus, TuiState};

/// Screen layout, top to bottom: title, form card, status banner (only while
/// a message is showing), todo table.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let mut banner = StatusBanner::new(app.status.as_ref());
    let [title_area, form_area, banner_area, table_area] = Layout::vertical([
        Length(1),
        Length(FORM_HEIGHT),
        Length(banner.height()),
        Min(0),
    ])
    .areas(frame.area());

    TitleBar::new(app.items.len(), app.editing_id.clone(), app.in_flight)
        .render(frame, title_area);

    TodoFormView::new(
        &app.form,
        &tui.form,
        app.is_editing(),
        matches!(tui.focus, Focus::Form),
    )
    .render(frame, form_area);

    banner.render(frame, banner_area);

    TodoTable::new(
        &app.items,
        &mut tui.table,
        tui.description_preview_chars,
        matches!(tui.focus, Focus::Table),
    )
    .render(frame, table_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{item, test_app};
    use crate::api::Reply;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_empty_app() {
        let app = test_app();
        let mut tui = TuiState::new(50);
        let text = screen(&app, &mut tui);
        assert!(text.contains("Todo APP"));
        assert!(text.contains("Add Todo"));
        assert!(text.contains("No todos yet."));
    }

    #[test]
    fn test_draw_after_list_shows_rows_and_banner() {
        let mut app = test_app();
        update(
            &mut app,
            Action::Listed(Ok(Reply {
                data: vec![item(1, "A", "short")],
                message: Some("Todos fetched".to_string()),
            })),
        );
        let mut tui = TuiState::new(50);
        let text = screen(&app, &mut tui);
        assert!(text.contains("1 todo"));
        assert!(text.contains("short"));
        assert!(text.contains("Todos fetched"));
    }

    #[test]
    fn test_draw_edit_mode_labels() {
        let mut app = test_app();
        app.items = vec![item(3, "C", "third")];
        update(&mut app, Action::BeginEdit(item(3, "C", "third")));
        let mut tui = TuiState::new(50);
        let text = screen(&app, &mut tui);
        assert!(text.contains("Edit Todo"));
        assert!(text.contains("Update"));
        assert!(text.contains("Editing #3"));
    }
}
