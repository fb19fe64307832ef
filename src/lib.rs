//! Who Dat Dev client library - session orchestration for the guessing game
//!
//! The game service thinks of a software character and narrows it down by
//! asking yes/no questions over HTTP. This crate drives one session of that
//! game from the player's side.
//!
//! # Architecture
//!
//! - **Api**: typed HTTP client for the game service endpoints
//! - **Game**: the session phase machine and its persistence rules
//! - **Store**: key/value session storage (SQLite on disk, memory for tests)
//! - **Tui**: terminal frontend that renders phases and collects answers
//!
//! # Example
//!
//! ```no_run
//! use whodat::{MemoryStore, SessionMachine};
//!
//! let mut machine = SessionMachine::new(MemoryStore::default());
//! machine.resume();
//! assert!(machine.begin_start());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod config;
mod game;
mod store;
mod tui;

// Crate-level exports - Service client
pub use api::{
    Answer, ClientError, ConfirmEnvelope, ConfirmReply, GameClient, NO_GUESS, StartGameReply,
    TopCandidate, TurnEnvelope, TurnReply,
};

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};

// Crate-level exports - Session machine
pub use game::{AnswerCall, ConfirmCall, Guess, Phase, Question, Route, SessionMachine};

// Crate-level exports - Session storage
pub use store::{
    MemoryStore, NewSessionEntry, SessionEntry, SessionKey, SessionStore, SqliteStore, StoreError,
};

// Crate-level exports - Terminal frontend
pub use tui::{GameController, Screen, ScreenAction, ViewState, run_tui};
