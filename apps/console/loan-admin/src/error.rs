use common::ErrorLocation;
use lending_client::{ApiClientError, ConfigError, CoreError, ErrorKind, StorageError};

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by console commands.
///
/// Serializable so `--json` style consumers get the same structure the
/// console prints, with location tracking kept internally.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum LoanAdminError {
    /// Error from this App
    #[error("Loan Admin Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Classified backend or network failure, or a local client failure.
    #[error("API Error: {message} {location}")]
    Api {
        message: String,
        status: Option<u16>,
        kind: Option<String>,
        location: ErrorLocation,
    },

    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage Error: {message} {location}")]
    Storage {
        message: String,
        location: ErrorLocation,
    },
}

impl LoanAdminError {
    #[track_caller]
    pub fn app(message: impl Into<String>) -> Self {
        LoanAdminError::App {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            LoanAdminError::Api { kind: Some(kind), .. } if kind == ErrorKind::AuthExpired.as_str()
        )
    }
}

impl From<ApiClientError> for LoanAdminError {
    #[track_caller]
    fn from(error: ApiClientError) -> Self {
        let message = match error.structured() {
            Some(structured) => structured.message.clone(),
            None => error.to_string(),
        };
        LoanAdminError::Api {
            message,
            status: error.status_code().map(|s| s.as_u16()),
            kind: error.kind().map(|k| k.as_str().to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for LoanAdminError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        LoanAdminError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StorageError> for LoanAdminError {
    #[track_caller]
    fn from(error: StorageError) -> Self {
        LoanAdminError::Storage {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for LoanAdminError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Api(e) => e.into(),
            CoreError::Config(e) => e.into(),
            CoreError::Storage(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for LoanAdminError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        LoanAdminError::App {
            message: format!("Failed to render output: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
