//! Database models for the session store.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::store::schema;

/// One persisted session entry.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::session_entries)]
#[diesel(primary_key(key))]
pub struct SessionEntry {
    key: String,
    value: String,
    updated_at: NaiveDateTime,
}

impl SessionEntry {
    /// Consumes the entry, returning its value.
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Insertable session entry for writes.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::session_entries)]
pub struct NewSessionEntry {
    key: String,
    value: String,
}
