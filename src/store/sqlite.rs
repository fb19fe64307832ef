//! SQLite-backed session store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::store::{NewSessionEntry, SessionEntry, SessionKey, SessionStore, StoreError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Session store persisted in a SQLite database.
///
/// Connections are established per operation, so the store is cheap to
/// clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the store at the given path, creating the database and
    /// running pending migrations as needed.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests),
    /// though note that each operation opens a fresh connection, so an
    /// in-memory store does not retain data between operations; prefer
    /// [`MemoryStore`](crate::store::MemoryStore) for ephemeral runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or a
    /// migration fails.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        let mut conn = store.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migration failed: {}", e)))?;
        info!(path = %store.db_path, "Session store ready");
        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Lists every stored entry, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<Vec<SessionEntry>, StoreError> {
        let mut conn = self.connection()?;

        let entries = schema::session_entries::table
            .order(schema::session_entries::key.asc())
            .select(SessionEntry::as_select())
            .load::<SessionEntry>(&mut conn)?;

        debug!(count = entries.len(), "Entries loaded");
        Ok(entries)
    }
}

impl SessionStore for SqliteStore {
    #[instrument(skip(self, value), fields(key = %key))]
    fn put(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;

        let entry = NewSessionEntry::new(key.as_str().to_string(), value.to_string());
        diesel::insert_into(schema::session_entries::table)
            .values(&entry)
            .on_conflict(schema::session_entries::key)
            .do_update()
            .set((
                schema::session_entries::value.eq(value),
                schema::session_entries::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        debug!("Entry written");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    fn get(&self, key: SessionKey) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;

        let entry = schema::session_entries::table
            .find(key.as_str())
            .select(SessionEntry::as_select())
            .first::<SessionEntry>(&mut conn)
            .optional()?;

        debug!(present = entry.is_some(), "Entry looked up");
        Ok(entry.map(SessionEntry::into_value))
    }

    #[instrument(skip(self), fields(count = keys.len()))]
    fn clear(&self, keys: &[SessionKey]) -> Result<(), StoreError> {
        let mut conn = self.connection()?;

        let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        let removed = diesel::delete(
            schema::session_entries::table.filter(schema::session_entries::key.eq_any(names)),
        )
        .execute(&mut conn)?;

        debug!(removed, "Entries cleared");
        Ok(())
    }
}
