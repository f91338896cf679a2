use crate::RedactedToken;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a login request.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: RedactedToken,
    pub refresh: RedactedToken,
}

/// Successful refresh payload.
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedAccess {
    pub access: RedactedToken,
    #[serde(default)]
    pub refresh: Option<RedactedToken>,
}
