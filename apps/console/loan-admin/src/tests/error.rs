// Unit tests for console errors
// Errors are printed as JSON, so their shape is part of the output.

use crate::error::LoanAdminError;

use common::{ErrorLocation, HttpStatusCode};
use lending_client::classifier::{SESSION_EXPIRED_REDIRECT_MESSAGE, classify_response};
use lending_client::{ApiClientError, ConfigError, ErrorKind};

use std::panic::Location;

use serde_json::{Value, json};

/// **VALUE**: Errors serialize with a type tag and their data.
///
/// **BUG THIS CATCHES**: Dropping `#[derive(Serialize)]` or the tag/content
/// attributes, which would change what the console prints on failure.
#[test]
fn given_app_error_when_serialized_then_tagged_with_variant() {
    // GIVEN: An App error
    let err = LoanAdminError::App {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let value: Value = serde_json::to_value(&err).unwrap();

    // THEN: Variant name and message are present
    assert_eq!(value["type"], "App");
    assert_eq!(value["data"]["message"], "Test");
    assert!(value["data"]["location"]["line"].is_u64());
}

#[test]
fn given_classified_failure_when_converted_then_status_and_kind_kept() {
    let structured = classify_response(
        HttpStatusCode::from(409),
        Some(&json!({"detail": "Duplicate payment reference"})),
        Some("POST"),
        Some("http://127.0.0.1:8000/api/payments/"),
    );

    let err = LoanAdminError::from(ApiClientError::api(structured));

    match &err {
        LoanAdminError::Api {
            message,
            status,
            kind,
            ..
        } => {
            assert_eq!(message, "Duplicate payment reference");
            assert_eq!(*status, Some(409));
            assert_eq!(kind.as_deref(), Some(ErrorKind::Client.as_str()));
        }
        other => panic!("expected Api, got {other:?}"),
    }
    assert!(!err.is_auth_expired());
}

#[test]
fn given_expired_session_failure_when_converted_then_auth_expired() {
    let structured = classify_response(HttpStatusCode::from(401), None, Some("GET"), None)
        .into_session_expired(SESSION_EXPIRED_REDIRECT_MESSAGE);

    let err = LoanAdminError::from(ApiClientError::api(structured));

    assert!(err.is_auth_expired());
}

#[test]
fn given_local_client_failure_when_converted_then_no_status() {
    let err = LoanAdminError::from(ApiClientError::http("builder failed"));

    match err {
        LoanAdminError::Api { status, kind, .. } => {
            assert_eq!(status, None);
            assert_eq!(kind, None);
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[test]
fn given_config_error_when_converted_then_config_variant() {
    let config_error = ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: "base_url must not be empty".to_string(),
    };

    let err = LoanAdminError::from(config_error);

    assert!(matches!(err, LoanAdminError::Config { .. }));
    assert!(err.to_string().contains("base_url must not be empty"));
}
