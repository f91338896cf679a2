use crate::storage::{
    ACCESS_TOKEN_KEY, CredentialStore, FileStore, KeyValueStore, MemoryStore, REFRESH_TOKEN_KEY,
    Session, THEME_KEY, Theme, TokenKind,
};

use common::RedactedToken;

use std::sync::Arc;

use tempfile::TempDir;

fn memory_credentials() -> (Arc<MemoryStore>, CredentialStore) {
    let store = Arc::new(MemoryStore::new());
    let credentials = CredentialStore::new(store.clone());
    (store, credentials)
}

fn session(access: &str, refresh: &str) -> Session {
    Session {
        access: RedactedToken::new(access),
        refresh: RedactedToken::new(refresh),
    }
}

#[test]
fn given_empty_store_when_reading_then_no_tokens_and_not_authenticated() {
    let (_, credentials) = memory_credentials();

    assert_eq!(credentials.get(TokenKind::Access).expect("get"), None);
    assert_eq!(credentials.session().expect("session"), None);
    assert!(!credentials.is_authenticated().expect("auth"));
}

#[test]
fn given_stored_session_when_reading_then_tokens_under_fixed_keys() {
    let (store, credentials) = memory_credentials();

    credentials
        .store_session(&session("access-1", "refresh-1"))
        .expect("store");

    assert_eq!(store.get(ACCESS_TOKEN_KEY).expect("get").as_deref(), Some("access-1"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).expect("get").as_deref(), Some("refresh-1"));
    assert_eq!(credentials.session().expect("session"), Some(session("access-1", "refresh-1")));
    assert!(credentials.is_authenticated().expect("auth"));
}

/// **VALUE**: Logging out removes both tokens but keeps the UI preference.
///
/// **BUG THIS CATCHES**: A `clear()` that wipes the whole store and resets the
/// theme on every session expiry.
#[test]
fn given_session_and_theme_when_clear_then_only_tokens_removed() {
    let (store, credentials) = memory_credentials();
    credentials.store_session(&session("a", "r")).expect("store");
    credentials.set_theme(Theme::Light).expect("theme");

    credentials.clear().expect("clear");

    assert_eq!(credentials.get(TokenKind::Access).expect("get"), None);
    assert_eq!(credentials.get(TokenKind::Refresh).expect("get"), None);
    assert_eq!(credentials.theme().expect("theme"), Theme::Light);
    assert_eq!(store.len(), 1);
}

#[test]
fn given_no_or_garbage_theme_when_read_then_dark() {
    let (store, credentials) = memory_credentials();
    assert_eq!(credentials.theme().expect("theme"), Theme::Dark);

    store.set(THEME_KEY, "sepia").expect("set");

    assert_eq!(credentials.theme().expect("theme"), Theme::Dark);
}

#[test]
fn given_empty_token_value_when_read_then_treated_as_absent() {
    let (store, credentials) = memory_credentials();
    store.set(ACCESS_TOKEN_KEY, "").expect("set");

    assert_eq!(credentials.get(TokenKind::Access).expect("get"), None);
}

/// **VALUE**: Tokens written through one `FileStore` are visible to a new one
/// opened on the same path.
///
/// **WHY THIS MATTERS**: This is the reload-surviving store; a restart of the
/// console must not log the operator out.
#[test]
fn given_file_store_when_reopened_then_session_survives() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("session.json");

    {
        let credentials = CredentialStore::new(Arc::new(FileStore::open(&path).expect("open")));
        credentials.store_session(&session("persisted", "persisted-refresh")).expect("store");
        credentials.set_theme(Theme::Light).expect("theme");
    }

    let reopened = CredentialStore::new(Arc::new(FileStore::open(&path).expect("reopen")));
    assert_eq!(
        reopened.session().expect("session"),
        Some(session("persisted", "persisted-refresh"))
    );
    assert_eq!(reopened.theme().expect("theme"), Theme::Light);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn given_corrupt_file_when_open_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[1, 2, 3]").expect("write");

    let result = FileStore::open(&path);

    assert!(matches!(result, Err(crate::error::StorageError::Parse { .. })));
}

#[test]
fn given_missing_key_when_remove_then_ok_and_file_untouched() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    let store = FileStore::open(&path).expect("open");

    store.remove(ACCESS_TOKEN_KEY).expect("remove");

    assert!(!path.exists());
}

/// **VALUE**: A failed write leaves the store as it was, so reads never
/// report a value the file does not hold.
#[test]
fn given_unwritable_store_when_set_or_remove_then_memory_unchanged() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    let store = FileStore::open(&path).expect("open");
    store.set(ACCESS_TOKEN_KEY, "kept").expect("first write");

    // A directory where the temp file should go makes every write fail.
    std::fs::create_dir(path.with_extension("json.tmp")).expect("block temp file");

    assert!(store.set(ACCESS_TOKEN_KEY, "lost").is_err());
    assert!(store.set(REFRESH_TOKEN_KEY, "lost").is_err());
    assert!(store.remove(ACCESS_TOKEN_KEY).is_err());

    assert_eq!(store.get(ACCESS_TOKEN_KEY).expect("get").as_deref(), Some("kept"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).expect("get"), None);
    let reopened = FileStore::open(&path).expect("reopen");
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).expect("get").as_deref(), Some("kept"));
}

#[test]
fn given_theme_strings_when_parsed_then_case_insensitive() {
    assert_eq!("LIGHT".parse::<Theme>(), Ok(Theme::Light));
    assert_eq!(" dark ".parse::<Theme>(), Ok(Theme::Dark));
    assert!("blue".parse::<Theme>().is_err());
}
