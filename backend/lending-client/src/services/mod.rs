//! Typed calls against the backend's REST routes.
//!
//! Each function is a fixed method and path on [`ApiClient`](crate::ApiClient)
//! returning the decoded payload. Failures propagate unchanged: they were
//! already classified and published by the client core.

pub mod analytics;
pub mod auth;
pub mod clients;
pub mod loans;
pub mod payments;
pub mod retry;

pub use retry::{RetryPolicy, retry_idempotent};
