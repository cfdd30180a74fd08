//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::provider::{FetchWorker, PageProvider};
use crate::species::Species;
use crate::table::RowSource;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, ViewOptions};

/// Main TUI application.
pub struct App {
    provider: Box<dyn PageProvider<Row = Species>>,
    state: AppState,
    should_quit: bool,
}

impl App {
    /// Creates a new App over the given provider.
    pub fn new(
        provider: Box<dyn PageProvider<Row = Species>>,
        options: &ViewOptions,
    ) -> io::Result<Self> {
        let state = AppState::new(provider.describe(), options)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            provider,
            state,
            should_quit: false,
        })
    }

    /// Runs the TUI application.
    pub fn run(self, tick_rate: Duration) -> io::Result<()> {
        let App {
            provider,
            mut state,
            mut should_quit,
        } = self;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);
        let worker = FetchWorker::spawn(provider, events.sender(), Event::PageFetched);
        info!(source = %state.source, "pagetab started");

        // First page is fetched without waiting for a key press.
        if let Some(page) = state.begin_fetch() {
            dispatch(&worker, &mut state, page);
        }

        let result = loop {
            if let Err(e) = terminal.draw(|frame| render(frame, &mut state)) {
                break Err(e);
            }

            match events.next() {
                Ok(Event::Tick) => state.tick(),
                Ok(Event::Key(key)) => match handle_key(&mut state, key) {
                    KeyAction::Quit => should_quit = true,
                    KeyAction::FetchPage(page) => dispatch(&worker, &mut state, page),
                    KeyAction::None => {}
                },
                Ok(Event::Resize(width, height)) => {
                    // The next draw picks up the new viewport.
                    debug!(width, height, "terminal resized");
                }
                Ok(Event::PageFetched(outcome)) => state.apply_fetch(outcome),
                Err(_) => should_quit = true,
            }

            if should_quit {
                break Ok(());
            }
        };

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        info!(rows = state.rows.len(), "pagetab stopped");
        result
    }
}

fn dispatch(worker: &FetchWorker, state: &mut AppState, page: u32) {
    if let Err(e) = worker.request(page) {
        state.abort_fetch(page, &e);
    }
}
