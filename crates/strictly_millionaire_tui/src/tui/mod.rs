//! Terminal UI for Strictly Millionaire.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, action_for};
pub use ui::format_prize;

use crate::config::AppConfig;
use crate::driver::{Command, Driver, DriverEvent, DriverHandle};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// How long to wait for a key before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Run the TUI game.
pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting Strictly Millionaire TUI");

    // Build the session before touching the terminal so errors print normally
    let session = config.build_session()?;
    let (handle, mut events, task) = Driver::spawn(session);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &handle, &mut events).await;

    handle.send(Command::Shutdown);
    if let Err(e) = task.await {
        error!(error = %e, "Driver task failed");
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Draw, poll keys, forward commands, repeat.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &DriverHandle,
    events: &mut mpsc::UnboundedReceiver<DriverEvent>,
) -> Result<()> {
    let mut app = App::new();

    loop {
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        // crossterm polling blocks, so keep it off the runtime threads
        let key = tokio::task::spawn_blocking(|| -> io::Result<Option<event::KeyEvent>> {
            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    return Ok(Some(key));
                }
            }
            Ok(None)
        })
        .await??;

        if let Some(key) = key.filter(|k| k.kind == KeyEventKind::Press) {
            if let Some(command) = app.handle_key(key.code) {
                info!(?command, "Sending command");
                if !handle.send(command) {
                    anyhow::bail!("driver stopped unexpectedly");
                }
            }
        }

        if app.should_exit() {
            info!("User exited");
            return Ok(());
        }
    }
}
