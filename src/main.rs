//! Who Dat Dev terminal client.
//!
//! `play` runs the interactive TUI; `status`, `reset` and `ping` are small
//! maintenance commands that share the same config and session store.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;
use whodat::{AppConfig, GameClient, SessionKey, SessionStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            server_url,
            db_path,
            config,
            ephemeral,
            log_file,
        } => {
            let config = AppConfig::load(config.as_deref())?.with_overrides(server_url, db_path);
            whodat::run_tui(config, ephemeral, &log_file).await
        }
        Command::Status { db_path, config } => {
            initialize_tracing();
            let config = AppConfig::load(config.as_deref())?.with_overrides(None, db_path);
            run_status(&config)
        }
        Command::Reset { db_path, config } => {
            initialize_tracing();
            let config = AppConfig::load(config.as_deref())?.with_overrides(None, db_path);
            run_reset(&config)
        }
        Command::Ping { server_url, config } => {
            initialize_tracing();
            let config = AppConfig::load(config.as_deref())?.with_overrides(server_url, None);
            run_ping(&config).await
        }
    }
}

/// Tracing for the one-shot commands. Logs go to stderr so command
/// output on stdout stays clean.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Print the stored session entries and whether they add up to a
/// resumable game.
fn run_status(config: &AppConfig) -> Result<()> {
    info!(db_path = %config.db_path(), "Inspecting session store");
    let store = SqliteStore::open(config.db_path())?;
    let entries = store.snapshot()?;

    println!("Session store: {}", config.db_path());
    if entries.is_empty() {
        println!("  (empty)");
        return Ok(());
    }

    for key in SessionKey::all() {
        match entries.iter().find(|entry| entry.key() == key.as_str()) {
            Some(entry) => println!("  {:<16} = {}", key.as_str(), entry.value()),
            None => println!("  {:<16} (absent)", key.as_str()),
        }
    }

    if let Some(updated) = entries.iter().map(|entry| entry.updated_at()).max() {
        println!("Last updated: {} UTC", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    let resumable = SessionKey::required()
        .iter()
        .all(|key| entries.iter().any(|entry| entry.key() == key.as_str()));
    println!("Resumable: {}", if resumable { "yes" } else { "no" });

    Ok(())
}

/// Drop every stored session entry.
fn run_reset(config: &AppConfig) -> Result<()> {
    info!(db_path = %config.db_path(), "Clearing stored session");
    let store = SqliteStore::open(config.db_path())?;
    store.clear(SessionKey::all())?;
    println!("Session cleared.");
    Ok(())
}

/// Hit the service root and report what came back.
async fn run_ping(config: &AppConfig) -> Result<()> {
    info!(server_url = %config.server_url(), "Pinging game service");
    let client = GameClient::new(config.server_url(), config.timeout())?;
    let message = client.ping().await?;
    println!("Service reachable at {}", config.server_url());
    if let Some(message) = message {
        println!("  {message}");
    }
    Ok(())
}
