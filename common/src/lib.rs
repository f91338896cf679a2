//! Shared building blocks for the loan administration workspace.
//!
//! This crate holds the leaf types every other crate depends on: error
//! location tracking, HTTP status classification, secret token handling,
//! and the payload models exchanged with the lending backend. Nothing in
//! here performs I/O.
//!
//! ## Architecture
//!
//! - **common** (this crate): Pure data structures and helpers
//! - **lending-client**: Authenticated API access operating on these models
//! - **loan-admin**: Operator console wiring everything together

pub mod error;
pub mod http_status;
pub mod models;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
