//! Terminal UI for the Who Dat Dev session client.

mod controller;
mod screen;
mod screens;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use tracing::{error, info};

use crate::api::GameClient;
use crate::config::AppConfig;
use crate::game::SessionMachine;
use crate::store::{MemoryStore, SqliteStore};

pub use controller::GameController;
pub use screen::{Screen, ScreenAction, ViewState};

/// Runs the session TUI until the player quits.
///
/// With `ephemeral` set the session lives only in memory; otherwise it
/// persists to the configured SQLite database and is resumed on the next
/// launch. Logs go to `log_file` so tracing output never fights the
/// terminal.
///
/// # Errors
///
/// Returns an error if the terminal, the session store, or the HTTP
/// client cannot be set up, or if the event loop fails.
pub async fn run_tui(config: AppConfig, ephemeral: bool, log_file: &Path) -> Result<()> {
    // Log to file to avoid interfering with the TUI.
    let file = std::fs::File::create(log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();

    info!(
        server_url = %config.server_url(),
        db_path = %config.db_path(),
        ephemeral,
        "Starting Who Dat Dev TUI"
    );

    let client = GameClient::new(config.server_url(), config.timeout())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = if ephemeral {
        let machine = SessionMachine::new(MemoryStore::new());
        GameController::new(client, machine).run(&mut terminal).await
    } else {
        match SqliteStore::open(config.db_path()) {
            Ok(store) => {
                let machine = SessionMachine::new(store);
                GameController::new(client, machine).run(&mut terminal).await
            }
            Err(e) => Err(e.into()),
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Session loop error");
        return Err(err);
    }
    Ok(())
}
