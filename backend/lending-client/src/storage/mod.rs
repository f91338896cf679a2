//! Reload-surviving credential storage.
//!
//! The client never touches a concrete backend directly: it reads and writes
//! through [`KeyValueStore`], so tests run against [`MemoryStore`] and the
//! console persists to disk with [`FileStore`].

pub mod credentials;
pub mod file;
pub mod memory;

pub use credentials::{CredentialStore, Session, Theme};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const THEME_KEY: &str = "theme";

/// Minimal string key-value interface backing the credential store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_TOKEN_KEY,
            TokenKind::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}
