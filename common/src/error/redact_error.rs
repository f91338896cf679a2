use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Misuse of a [`RedactedToken`](crate::RedactedToken).
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Empty Token Error: {message} {location}")]
    EmptyToken {
        message: String,
        location: ErrorLocation,
    },
}
