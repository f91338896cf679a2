//! Error type returned by every [`ApiClient`](crate::ApiClient) call.
//!
//! Key design decisions:
//! - Backend and network failures arrive already classified as a
//!   [`StructuredError`]; that record is what subscribers saw
//! - Local failures (payload decoding, URL joining, storage) are never
//!   published to subscribers
//! - All variants include ErrorLocation for debugging

use crate::classifier::{ErrorKind, StructuredError};
use crate::error::StorageError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiClientError {
    #[error("API Error: {error} {location}")]
    Api {
        error: StructuredError,
        location: ErrorLocation,
    },

    #[error("HTTP Client Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage Error: {source} {location}")]
    Storage {
        #[source]
        source: StorageError,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for ApiClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ApiClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StorageError> for ApiClientError {
    #[track_caller]
    fn from(source: StorageError) -> Self {
        ApiClientError::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl ApiClientError {
    #[track_caller]
    pub fn api(error: StructuredError) -> Self {
        ApiClientError::Api {
            error,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn http(message: impl Into<String>) -> Self {
        ApiClientError::Http {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The classified failure, if this error came from the backend or the network.
    pub fn structured(&self) -> Option<&StructuredError> {
        match self {
            ApiClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn into_structured(self) -> Option<StructuredError> {
        match self {
            ApiClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<HttpStatusCode> {
        self.structured().map(StructuredError::status_code)
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.structured().map(|error| error.kind)
    }

    /// Retry eligibility for idempotent reads: network, 429 and 5xx only.
    pub fn is_retryable(&self) -> bool {
        self.structured().is_some_and(StructuredError::is_retryable)
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind() == Some(ErrorKind::AuthExpired)
    }

    /// Get error category for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            ApiClientError::Api { error, .. } => error.kind.as_str(),
            ApiClientError::Http { .. } => "http_client",
            ApiClientError::Json { .. } => "json",
            ApiClientError::UrlParse { .. } => "url_parse",
            ApiClientError::Storage { .. } => "storage",
        }
    }
}
