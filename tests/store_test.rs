//! Tests for the SQLite-backed session store.

use tempfile::NamedTempFile;

use whodat::{SessionKey, SessionStore, SqliteStore};

/// Creates a temporary database file and an opened store. The file
/// handle must stay in scope to keep the database alive.
fn setup_test_store() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(&db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_put_then_get_roundtrip() {
    let (_db, store) = setup_test_store();
    store
        .put(SessionKey::SessionId, "sess-42")
        .expect("Put failed");
    let value = store.get(SessionKey::SessionId).expect("Get failed");
    assert_eq!(value.as_deref(), Some("sess-42"));
}

#[test]
fn test_get_absent_key_is_none() {
    let (_db, store) = setup_test_store();
    let value = store.get(SessionKey::GuessData).expect("Get failed");
    assert!(value.is_none());
}

#[test]
fn test_put_overwrites_existing_value() {
    let (_db, store) = setup_test_store();
    store
        .put(SessionKey::QuestionsAsked, "1")
        .expect("First put failed");
    store
        .put(SessionKey::QuestionsAsked, "2")
        .expect("Second put failed");
    let value = store.get(SessionKey::QuestionsAsked).expect("Get failed");
    assert_eq!(value.as_deref(), Some("2"));
}

#[test]
fn test_clear_removes_keys() {
    let (_db, store) = setup_test_store();
    for key in SessionKey::all() {
        store.put(*key, "value").expect("Put failed");
    }
    store.clear(SessionKey::all()).expect("Clear failed");
    for key in SessionKey::all() {
        let value = store.get(*key).expect("Get failed");
        assert!(value.is_none(), "{key} should be cleared");
    }
}

#[test]
fn test_clear_subset_keeps_rest() {
    let (_db, store) = setup_test_store();
    store
        .put(SessionKey::SessionId, "sess-42")
        .expect("Put failed");
    store
        .put(SessionKey::GuessData, r#"{"guess":"Ada","certainty":0.5}"#)
        .expect("Put failed");

    store
        .clear(&[SessionKey::GuessData])
        .expect("Clear failed");

    assert!(store.get(SessionKey::GuessData).expect("Get failed").is_none());
    assert_eq!(
        store.get(SessionKey::SessionId).expect("Get failed").as_deref(),
        Some("sess-42")
    );
}

#[test]
fn test_clear_absent_keys_is_noop() {
    let (_db, store) = setup_test_store();
    store.clear(SessionKey::all()).expect("Clear on empty failed");
    store
        .clear(&[SessionKey::SessionId])
        .expect("Repeated clear failed");
}

#[test]
fn test_snapshot_lists_entries_ordered_by_key() {
    let (_db, store) = setup_test_store();
    store
        .put(SessionKey::SessionId, "sess-42")
        .expect("Put failed");
    store
        .put(SessionKey::QuestionText, "Do they write Rust?")
        .expect("Put failed");
    store
        .put(SessionKey::AttributeKey, "writes_rust")
        .expect("Put failed");

    let entries = store.snapshot().expect("Snapshot failed");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].key(), "attribute_key");
    assert_eq!(entries[1].key(), "question_text");
    assert_eq!(entries[2].key(), "session_id");
    assert_eq!(entries[2].value(), "sess-42");
}

#[test]
fn test_snapshot_of_empty_store() {
    let (_db, store) = setup_test_store();
    let entries = store.snapshot().expect("Snapshot failed");
    assert!(entries.is_empty());
}

#[test]
fn test_reopen_preserves_entries() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    {
        let store = SqliteStore::open(&db_path).expect("Failed to open store");
        store
            .put(SessionKey::SessionId, "sess-42")
            .expect("Put failed");
    }

    let reopened = SqliteStore::open(&db_path).expect("Failed to reopen store");
    let value = reopened.get(SessionKey::SessionId).expect("Get failed");
    assert_eq!(value.as_deref(), Some("sess-42"));
}

#[test]
fn test_open_creates_database_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("whodat.db");
    let db_path = db_path.to_str().expect("Invalid path");

    assert!(!std::path::Path::new(db_path).exists());
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    assert!(std::path::Path::new(db_path).exists());

    store
        .put(SessionKey::SessionId, "sess-42")
        .expect("Put failed");
}
