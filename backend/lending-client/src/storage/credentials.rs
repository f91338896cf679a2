use super::{KeyValueStore, THEME_KEY, TokenKind};
use crate::error::StorageError;

use common::RedactedToken;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Both halves of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access: RedactedToken,
    pub refresh: RedactedToken,
}

/// UI colour preference persisted next to the tokens.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

/// Owner of the persisted session.
///
/// Cheap to clone; every clone shares the same backing store. Values are read
/// from the store on every call and never cached here.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, kind: TokenKind) -> Result<Option<RedactedToken>, StorageError> {
        Ok(self
            .store
            .get(kind.key())?
            .filter(|value| !value.is_empty())
            .map(RedactedToken::new))
    }

    pub fn set(&self, kind: TokenKind, token: &RedactedToken) -> Result<(), StorageError> {
        debug!("Storing {} ({} chars)", kind.key(), token.len());
        self.store.set(kind.key(), token.as_str())
    }

    pub fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        self.set(TokenKind::Access, &session.access)?;
        self.set(TokenKind::Refresh, &session.refresh)
    }

    /// Remove both tokens. The theme preference is kept.
    pub fn clear(&self) -> Result<(), StorageError> {
        debug!("Clearing stored session");
        self.store.remove(TokenKind::Access.key())?;
        self.store.remove(TokenKind::Refresh.key())
    }

    pub fn session(&self) -> Result<Option<Session>, StorageError> {
        let access = self.get(TokenKind::Access)?;
        let refresh = self.get(TokenKind::Refresh)?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(Session { access, refresh }),
            _ => None,
        })
    }

    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.get(TokenKind::Access)?.is_some())
    }

    pub fn theme(&self) -> Result<Theme, StorageError> {
        let Some(raw) = self.store.get(THEME_KEY)? else {
            return Ok(Theme::default());
        };
        Ok(raw.parse().unwrap_or_else(|reason: String| {
            warn!("Stored theme ignored: {}", reason);
            Theme::default()
        }))
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
