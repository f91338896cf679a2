//! Normalization of every failed call into a [`StructuredError`].
//!
//! Two entry points: [`classify_transport`] when no HTTP response arrived and
//! [`classify_response`] when one did. Both are pure; publishing the record is
//! the client's job.

use common::HttpStatusCode;

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TIMEOUT_MESSAGE: &str = "Request took too long";
pub const NETWORK_MESSAGE: &str = "Connection error. Check your internet connection.";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid data";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const CONFLICT_MESSAGE: &str = "Operation conflict";
pub const VALIDATION_MESSAGE: &str = "Validation error";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";
pub const SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE: &str = "Session expired. Please log in again.";
pub const SESSION_EXPIRED_REDIRECT_MESSAGE: &str = "Session expired. Redirecting to login...";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Failure taxonomy shared by logs, notifications and retry decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No HTTP response: connectivity loss, DNS failure or timeout.
    Network,
    /// 401 that could not be recovered, or the refresh itself failed.
    AuthExpired,
    /// 4xx other than 401 and 429.
    Client,
    RateLimited,
    Server,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::AuthExpired => "auth_expired",
            ErrorKind::Client => "client",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Server => "server",
        }
    }

    pub fn from_status(status: HttpStatusCode) -> Self {
        if status.is_no_response() {
            ErrorKind::Network
        } else if status.is_unauthorized() {
            ErrorKind::AuthExpired
        } else if status.is_rate_limited() {
            ErrorKind::RateLimited
        } else if status.is_server_error() {
            ErrorKind::Server
        } else {
            ErrorKind::Client
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure record. Immutable once built; cloned to every
/// subscriber and to the rejected caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredError {
    /// HTTP status, `0` when no response was received.
    pub status: u16,
    pub message: String,
    pub detail: Option<String>,
    pub errors: Option<Value>,
    pub timestamp: String,
    pub url: Option<String>,
    pub method: Option<String>,
    pub kind: ErrorKind,
}

impl StructuredError {
    pub fn status_code(&self) -> HttpStatusCode {
        HttpStatusCode::from(self.status)
    }

    pub fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Same record re-labelled as an expired session with the given wording.
    pub fn into_session_expired(mut self, message: &str) -> Self {
        self.kind = ErrorKind::AuthExpired;
        self.message = message.to_string();
        self
    }

    /// A rejected login is the caller's mistake, not an expired session.
    pub fn into_invalid_credentials(mut self) -> Self {
        self.kind = ErrorKind::Client;
        if self.detail.is_none() {
            self.message = INVALID_CREDENTIALS_MESSAGE.to_string();
        }
        self
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)?;
        if let (Some(method), Some(url)) = (&self.method, &self.url) {
            write!(f, " ({method} {url})")?;
        }
        Ok(())
    }
}

/// Why a request produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Other(String),
}

impl TransportFailure {
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_connect() {
            TransportFailure::Connect
        } else {
            TransportFailure::Other(error.to_string())
        }
    }

    fn message(&self) -> &'static str {
        match self {
            TransportFailure::Timeout => TIMEOUT_MESSAGE,
            TransportFailure::Connect | TransportFailure::Other(_) => NETWORK_MESSAGE,
        }
    }
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn timestamp_now() -> String {
    humantime::format_rfc3339_millis(SystemTime::now()).to_string()
}

pub fn classify_transport(
    failure: &TransportFailure,
    method: Option<&str>,
    url: Option<&str>,
) -> StructuredError {
    StructuredError {
        status: HttpStatusCode::NO_RESPONSE.as_u16(),
        message: failure.message().to_string(),
        detail: match failure {
            TransportFailure::Other(reason) => Some(reason.clone()),
            _ => None,
        },
        errors: None,
        timestamp: timestamp_now(),
        url: url.map(str::to_string),
        method: method.map(str::to_string),
        kind: ErrorKind::Network,
    }
}

/// Classify an HTTP error response.
///
/// Message precedence is the server's `message`, then its `detail`, then the
/// fixed wording for the status. 429 and 5xx always use the fixed wording.
pub fn classify_response(
    status: HttpStatusCode,
    body: Option<&Value>,
    method: Option<&str>,
    url: Option<&str>,
) -> StructuredError {
    let server_message = body.and_then(|b| string_field(b, "message"));
    let detail = body.and_then(|b| string_field(b, "detail"));

    let message = if status.is_rate_limited() {
        RATE_LIMITED_MESSAGE.to_string()
    } else if status.is_server_error() {
        SERVER_ERROR_MESSAGE.to_string()
    } else {
        server_message
            .or_else(|| detail.clone())
            .unwrap_or_else(|| fixed_message(status).to_string())
    };

    StructuredError {
        status: status.as_u16(),
        message,
        detail,
        errors: body.and_then(field_errors),
        timestamp: timestamp_now(),
        url: url.map(str::to_string),
        method: method.map(str::to_string),
        kind: ErrorKind::from_status(status),
    }
}

fn fixed_message(status: HttpStatusCode) -> &'static str {
    match status {
        HttpStatusCode::BAD_REQUEST => BAD_REQUEST_MESSAGE,
        HttpStatusCode::UNAUTHORIZED => SESSION_EXPIRED_MESSAGE,
        HttpStatusCode::FORBIDDEN => FORBIDDEN_MESSAGE,
        HttpStatusCode::NOT_FOUND => NOT_FOUND_MESSAGE,
        HttpStatusCode::CONFLICT => CONFLICT_MESSAGE,
        HttpStatusCode::UNPROCESSABLE_ENTITY => VALIDATION_MESSAGE,
        HttpStatusCode::TOO_MANY_REQUESTS => RATE_LIMITED_MESSAGE,
        s if s.is_server_error() => SERVER_ERROR_MESSAGE,
        _ => UNKNOWN_ERROR_MESSAGE,
    }
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Per-field validation errors.
///
/// An explicit `errors` member wins; otherwise an object body made only of
/// field names (no `message`/`detail`) is taken whole.
fn field_errors(body: &Value) -> Option<Value> {
    if let Some(errors) = body.get("errors")
        && !errors.is_null()
    {
        return Some(errors.clone());
    }

    let object = body.as_object()?;
    if object.is_empty() || object.contains_key("message") || object.contains_key("detail") {
        return None;
    }
    Some(body.clone())
}
