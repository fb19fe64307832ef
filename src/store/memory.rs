//! In-memory session store for ephemeral runs and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use crate::store::{SessionKey, SessionStore, StoreError};

/// Session store held entirely in memory.
///
/// Clones share the same underlying map, so a test can keep a clone and
/// observe writes made through the state machine. Nothing survives the
/// process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<SessionKey, String>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SessionKey, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::new("Session store lock poisoned"))
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    #[instrument(skip(self, value), fields(key = %key))]
    fn put(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key, value.to_string());
        debug!("Entry written");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    fn get(&self, key: SessionKey) -> Result<Option<String>, StoreError> {
        let value = self.entries()?.get(&key).cloned();
        debug!(present = value.is_some(), "Entry looked up");
        Ok(value)
    }

    #[instrument(skip(self), fields(count = keys.len()))]
    fn clear(&self, keys: &[SessionKey]) -> Result<(), StoreError> {
        let mut entries = self.entries()?;
        for key in keys {
            entries.remove(key);
        }
        debug!("Entries cleared");
        Ok(())
    }
}
