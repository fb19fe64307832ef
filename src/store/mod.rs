//! Durable key-value persistence for game sessions.
//!
//! The orchestrator records just enough state to survive a restart: the
//! session id, the current question, and the latest guess. Stores expose
//! a small put/get/clear surface; absence of a key is an ordinary `None`,
//! never an error.

mod error;
mod keys;
mod memory;
mod models;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use keys::SessionKey;
pub use memory::MemoryStore;
pub use models::{NewSessionEntry, SessionEntry};
pub use sqlite::SqliteStore;

/// Persistent string-valued storage for session state.
///
/// Implementations must overwrite unconditionally on [`put`](Self::put)
/// and treat clearing an absent key as a no-op.
pub trait SessionStore {
    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store rejects the write.
    fn put(&self, key: SessionKey, value: &str) -> Result<(), StoreError>;

    /// Reads the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn get(&self, key: SessionKey) -> Result<Option<String>, StoreError>;

    /// Removes the given keys. Absent keys are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store rejects the removal.
    fn clear(&self, keys: &[SessionKey]) -> Result<(), StoreError>;
}
