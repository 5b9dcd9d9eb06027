//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core `Action` values and carries out the
//! `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! The loop owns `App` and is its only mutator. Backend requests and status
//! timers run as tokio tasks and send their results back as actions on an
//! mpsc channel, which is drained every iteration. Nothing is redrawn unless
//! an input event or an action arrived.

mod component;
mod components;
mod event;
pub mod tasks;
mod ui;

pub use components::truncate_description;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::api::{HttpBackend, TodoBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, FormField};
use crate::tui::component::EventHandler;
use crate::tui::components::{FormEvent, FormPanelState, TableEvent, TodoTableState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::tasks::{StatusTimer, spawn_request};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// Which half of the screen receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Table,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub form: FormPanelState,
    pub table: TodoTableState,
    pub description_preview_chars: usize,
}

impl TuiState {
    pub fn new(description_preview_chars: usize) -> Self {
        Self {
            focus: Focus::Form, // User expects to type immediately
            form: FormPanelState::new(),
            table: TodoTableState::new(),
            description_preview_chars,
        }
    }

    /// Tab order: Title → Description → Table → Title.
    fn focus_next(&mut self) {
        match (self.focus, self.form.field) {
            (Focus::Form, FormField::Title) => self.form.field = FormField::Description,
            (Focus::Form, FormField::Description) => self.focus = Focus::Table,
            (Focus::Table, _) => {
                self.focus = Focus::Form;
                self.form.field = FormField::Title;
            }
        }
    }

    fn focus_prev(&mut self) {
        match (self.focus, self.form.field) {
            (Focus::Form, FormField::Title) => self.focus = Focus::Table,
            (Focus::Form, FormField::Description) => self.form.field = FormField::Title,
            (Focus::Table, _) => {
                self.focus = Focus::Form;
                self.form.field = FormField::Description;
            }
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Carries out effects returned by `update()`.
struct Runtime {
    backend: Arc<dyn TodoBackend>,
    tx: mpsc::Sender<Action>,
    status_timer: StatusTimer,
}

impl Runtime {
    /// Returns true when the app should quit.
    fn apply(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::Quit => true,
            Effect::Request(request) => {
                spawn_request(self.backend.clone(), request, self.tx.clone());
                false
            }
            Effect::ArmStatusTimer(generation) => {
                self.status_timer.arm(generation, self.tx.clone());
                false
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn TodoBackend> =
        Arc::new(HttpBackend::new(&config.api_url).map_err(std::io::Error::other)?);
    info!("Using backend at {}", config.api_url);

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(config.description_preview_chars);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime {
        backend,
        tx,
        status_timer: StatusTimer::new(config.status_timeout),
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let result = event_loop(&mut terminal, &mut app, &mut tui, &mut runtime, &rx);

    info!("Shutting down");
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    runtime: &mut Runtime,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    let mut should_quit = runtime.apply(update(app, Action::Startup));
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(IDLE_POLL);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in route_event(&event, app, tui) {
                if runtime.apply(update(app, action)) {
                    should_quit = true;
                }
            }
        }

        // Handle background task actions (request completions, status expiry)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if runtime.apply(update(app, action)) {
                should_quit = true;
            }
        }
    }
    Ok(())
}

/// Translates one terminal event into core actions, updating focus and
/// component state on the way.
fn route_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Vec<Action> {
    match event {
        TuiEvent::Resize => return Vec::new(),
        TuiEvent::ForceQuit => return vec![Action::Quit],
        TuiEvent::Tab => {
            tui.focus_next();
            return Vec::new();
        }
        TuiEvent::BackTab => {
            tui.focus_prev();
            return Vec::new();
        }
        _ => {}
    }

    match tui.focus {
        Focus::Form => match tui.form.handle_event(event) {
            Some(FormEvent::Edit(edit)) => vec![Action::Form(edit)],
            Some(FormEvent::Submit) => match app.form.missing_field() {
                Some(field) => {
                    debug!("Submit blocked: {} is empty", field.label());
                    tui.form.require(field);
                    Vec::new()
                }
                None => {
                    tui.form.hint = None;
                    vec![Action::Submit]
                }
            },
            Some(FormEvent::Cancel) => vec![Action::CancelEdit],
            None => Vec::new(),
        },
        Focus::Table => {
            tui.table.sync_rows(&app.items);
            match tui.table.handle_event(event) {
                Some(TableEvent::Edit(index)) => match app.items.get(index) {
                    Some(item) => {
                        tui.focus = Focus::Form;
                        tui.form.field = FormField::Title;
                        tui.form.hint = None;
                        vec![Action::BeginEdit(item.clone())]
                    }
                    None => Vec::new(),
                },
                Some(TableEvent::Delete(id)) => vec![Action::Delete(id)],
                Some(TableEvent::Quit) => vec![Action::Quit],
                None => Vec::new(),
            }
        }
    }
}
