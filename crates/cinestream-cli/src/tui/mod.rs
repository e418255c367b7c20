//! TUI module for the interactive catalog browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Fetches run as spawned tasks
//! and report back over a channel; all state changes happen on the loop task.

/// Page controller.
pub mod app;
/// Card, hero and popup view models.
pub mod card;
mod keymap;
mod search;
/// Localized placeholder text.
mod text;
/// Page state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cinestream_api::tmdb::TmdbApi;
use cinestream_store::FavoritesStore;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

use self::app::{App, AppContext, Control, FetchOutcome};
pub use self::state::Page;

/// Interval of the tick that drives the search debounce and redraws.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the TUI on `page` until the user quits. `initial_query` prefills
/// the search page.
///
/// # Errors
///
/// Returns an error if terminal setup, event handling or teardown fails.
pub async fn run_tui<C>(
    api: Arc<C>,
    favorites: FavoritesStore,
    language: String,
    page: Page,
    initial_query: Option<String>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ctx = AppContext {
        api,
        favorites,
        language,
        outcomes: tx,
    };
    let mut app = App::new(ctx, page);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    app.start();
    if let Some(query) = initial_query {
        app.prefill_search(query, Instant::now());
    }
    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<C>,
    outcomes: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &mut app.state))
            .context("failed to draw TUI")?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    tracing::debug!("Terminal event stream closed");
                    return Ok(());
                };
                let event = event.context("failed to read event")?;
                if let Some(action) = keymap::resolve_event(&app.state, &event) {
                    tracing::trace!(?action, "Dispatching action");
                    if app.dispatch(action, Instant::now()) == Control::Quit {
                        return Ok(());
                    }
                }
            }
            Some(outcome) = outcomes.recv() => app.apply(outcome),
            _ = tick.tick() => app.tick(Instant::now()),
        }
    }
}
