//! Authenticated access to the lending backend's REST API.
//!
//! The crate is organized leaves first:
//! - [`storage`]: reload-surviving credential store behind an injected key-value interface
//! - [`api_client`]: HTTP client core with bearer/correlation headers and the refresh coordinator
//! - [`classifier`]: normalization of every failure into a [`StructuredError`]
//! - [`notifier`]: observer registry broadcasting classified failures, plus a transient banner board
//! - [`services`]: typed calls for auth, clients, loans, payments and analytics

pub mod api_client;
pub mod classifier;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notifier;
pub mod services;
pub mod storage;

#[cfg(test)]
mod tests;

pub use api_client::{ApiClient, ApiClientBuilder, AuthMode};
pub use classifier::{ErrorKind, StructuredError};
pub use config::ClientConfig;
pub use error::{ApiClientError, ConfigError, CoreError, StorageError};
pub use navigation::{Navigator, NoopNavigator};
pub use notifier::{
    ErrorNotifier, Notification, NotificationBoard, NotificationLevel, Subscription,
};
pub use services::retry::RetryPolicy;
pub use storage::{
    CredentialStore, FileStore, KeyValueStore, MemoryStore, Session, Theme, TokenKind,
};

use const_format::concatcp;

pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub const DEFAULT_BACKEND_PORT: u16 = 8000;
pub const DEFAULT_BASE_URL: &str =
    concatcp!("http://", DEFAULT_BACKEND_HOST, ":", DEFAULT_BACKEND_PORT, "/api/");

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

pub const AUTH_TOKEN_ENDPOINT: &str = "auth/token/";
pub const AUTH_REFRESH_ENDPOINT: &str = concatcp!(AUTH_TOKEN_ENDPOINT, "refresh/");
pub const CLIENTS_ENDPOINT: &str = "clients/";
pub const LOANS_ENDPOINT: &str = "loans/";
pub const LOAN_QUOTE_ENDPOINT: &str = concatcp!(LOANS_ENDPOINT, "quote/");
pub const PAYMENTS_ENDPOINT: &str = "payments/";
pub const DASHBOARD_ANALYTICS_ENDPOINT: &str = "analytics/dashboard/";
