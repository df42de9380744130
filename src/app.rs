use std::{
    io,
    sync::mpsc::Sender,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{info, warn};

use crate::{
    config::Config,
    constants::TIME_SETTINGS,
    domain::Category,
    stats::FocusSummary,
    storage::{CategoryRegistry, SessionStore, SharedStore},
    timer::{TimerController, TimerEvent, controller::Outcome},
};

mod category_modal_view;
mod category_state;
mod event_handlers;
mod render_views;
mod report_modal_view;
mod report_state;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Main,
    CategoryModal,
    ReportModal,
    DurationPrompt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct StatusLine {
    text: String,
    is_error: bool,
}

struct App {
    timer: TimerController,
    registry: CategoryRegistry,
    sessions: SessionStore,
    categories: Vec<Category>,
    ui_mode: UiMode,
    selected_index: usize,
    new_category_name: String,
    rename_target: Option<String>,
    duration_input: String,
    status: Option<StatusLine>,
    today_focus_sec: u64,
    report: Option<FocusSummary>,
    render_needed: bool,
}

impl App {
    fn new(store: SharedStore, tick: Duration) -> Self {
        let registry = CategoryRegistry::new(store.clone());
        let categories = registry.list();

        let mut app = Self {
            timer: TimerController::new(store.clone(), tick),
            registry,
            sessions: SessionStore::new(store),
            categories,
            ui_mode: UiMode::Main,
            selected_index: 0,
            new_category_name: String::new(),
            rename_target: None,
            duration_input: String::new(),
            status: None,
            today_focus_sec: 0,
            report: None,
            render_needed: true,
        };
        app.refresh_today();
        app.set_info("Press c to pick a category, space to start");
        app
    }

    fn open_modal(&mut self) {
        self.refresh_categories();
        self.ui_mode = UiMode::CategoryModal;
        self.selected_index = self
            .timer
            .machine()
            .category()
            .and_then(|name| self.categories.iter().position(|c| c.name == name))
            .unwrap_or(0);
        self.new_category_name = String::new();
        self.rename_target = None;
        self.render_needed = true;
    }

    fn close_modal(&mut self) {
        self.ui_mode = UiMode::Main;
        self.new_category_name = String::new();
        self.rename_target = None;
        self.render_needed = true;
    }

    fn open_duration_prompt(&mut self) {
        self.ui_mode = UiMode::DurationPrompt;
        self.duration_input.clear();
        self.render_needed = true;
    }

    fn close_duration_prompt(&mut self) {
        self.ui_mode = UiMode::Main;
        self.duration_input.clear();
        self.render_needed = true;
    }

    fn in_category_modal(&self) -> bool {
        matches!(self.ui_mode, UiMode::CategoryModal)
    }

    fn in_report_modal(&self) -> bool {
        matches!(self.ui_mode, UiMode::ReportModal)
    }

    fn in_duration_prompt(&self) -> bool {
        matches!(self.ui_mode, UiMode::DurationPrompt)
    }

    fn modal_rect_ratio(&self, terminal_size: Rect, numerator: u16, denominator: u16) -> Rect {
        let target_width = terminal_size.width.saturating_mul(numerator) / denominator;
        let target_height = (terminal_size.height.saturating_mul(numerator) / denominator).max(10);

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
        });
        self.render_needed = true;
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: true,
        });
        self.render_needed = true;
    }

    fn process_timer_events(&mut self) {
        for result in self.timer.drain() {
            match result {
                Ok(Outcome::Ignored) | Ok(Outcome::Foregrounded) => {}
                Ok(Outcome::Ticked { .. }) => self.render_needed = true,
                Ok(Outcome::Started { .. }) => self.set_info("Focus!"),
                Ok(Outcome::Resumed) => self.set_info("Resumed"),
                Ok(Outcome::Interrupted { distractions }) => self.set_error(format!(
                    "Paused: focus lost ({} distraction{}). space resumes, p saves, r discards",
                    distractions,
                    if distractions == 1 { "" } else { "s" }
                )),
                Ok(Outcome::Recorded(session)) => {
                    self.refresh_today();
                    let verb = if session.completed { "Completed" } else { "Saved" };
                    self.set_info(format!(
                        "{} {} min of {}",
                        verb,
                        session.duration_sec / 60,
                        session.category
                    ));
                }
                Ok(Outcome::Reset) => self.set_info("Reset"),
                Ok(Outcome::CategorySelected) | Ok(Outcome::CategoryCleared) => {
                    self.render_needed = true
                }
                Ok(Outcome::DurationStaged { minutes }) => {
                    self.set_info(format!("Next run: {} min", minutes))
                }
                Err(e) => {
                    warn!(error = %e, "timer command rejected");
                    self.set_error(e.to_string());
                }
            }
        }
    }

    fn shutdown(self) {
        self.timer.shutdown();
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), io::Error> {
    let lifecycle: Sender<TimerEvent> = app.timer.sender();
    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);
    let render_rate = Duration::from_millis(1000 / TIME_SETTINGS.target_fps);
    let mut last_render: Option<Instant> = None;

    loop {
        app.timer.poll_ticker(Instant::now());
        app.process_timer_events();

        let render_due = last_render.is_none_or(|at| at.elapsed() >= render_rate);
        if render_due && app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
            last_render = Some(Instant::now());
        }

        if !event::poll(poll_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) {
                    return Ok(());
                }
            }
            Event::FocusLost => {
                let _ = lifecycle.send(TimerEvent::Backgrounded);
            }
            Event::FocusGained => {
                let _ = lifecycle.send(TimerEvent::Foregrounded);
            }
            Event::Resize(..) => app.render_needed = true,
            _ => {}
        }
    }
}

pub fn run_ui(config: &Config, store: SharedStore) -> Result<(), io::Error> {
    info!(data_dir = %config.data_dir.display(), "starting timer screen");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, config.tick);
    let result = run_loop(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
