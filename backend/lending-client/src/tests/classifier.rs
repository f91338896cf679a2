// Unit tests for failure classification
// Status mapping, message precedence, field errors and the network sentinel

use crate::classifier::{
    BAD_REQUEST_MESSAGE, CONFLICT_MESSAGE, ErrorKind, FORBIDDEN_MESSAGE,
    INVALID_CREDENTIALS_MESSAGE, NETWORK_MESSAGE, NOT_FOUND_MESSAGE, RATE_LIMITED_MESSAGE,
    SERVER_ERROR_MESSAGE, SESSION_EXPIRED_REDIRECT_MESSAGE, TIMEOUT_MESSAGE,
    UNKNOWN_ERROR_MESSAGE, VALIDATION_MESSAGE, TransportFailure, classify_response,
    classify_transport,
};

use common::HttpStatusCode;

use serde_json::json;

// ============================================
// NO RESPONSE
// ============================================

/// **VALUE**: A dropped connection is reported with status 0 and the
/// connectivity wording.
///
/// **BUG THIS CATCHES**: A transport failure leaking through as an HTTP status
/// or with an empty message.
#[test]
fn given_connect_failure_when_classified_then_status_zero_with_connection_message() {
    let error = classify_transport(
        &TransportFailure::Connect,
        Some("GET"),
        Some("http://localhost/api/loans/"),
    );

    assert_eq!(error.status, 0);
    assert_eq!(error.message, NETWORK_MESSAGE);
    assert_eq!(error.kind, ErrorKind::Network);
    assert_eq!(error.method.as_deref(), Some("GET"));
    assert_eq!(error.url.as_deref(), Some("http://localhost/api/loans/"));
    assert!(error.is_retryable());
}

#[test]
fn given_timeout_when_classified_then_message_mentions_duration() {
    let error = classify_transport(&TransportFailure::Timeout, None, None);

    assert_eq!(error.status, 0);
    assert_eq!(error.message, TIMEOUT_MESSAGE);
    assert_eq!(error.detail, None);
}

#[test]
fn given_other_transport_failure_when_classified_then_reason_kept_as_detail() {
    let error = classify_transport(&TransportFailure::Other("body stream closed".into()), None, None);

    assert_eq!(error.message, NETWORK_MESSAGE);
    assert_eq!(error.detail.as_deref(), Some("body stream closed"));
}

// ============================================
// HTTP RESPONSES
// ============================================

/// **VALUE**: Every mapped status gets its fixed wording when the server sends
/// nothing usable.
///
/// **WHY THIS MATTERS**: These strings are what the banner shows; an empty
/// body from a proxy must still produce a readable message.
#[test]
fn given_empty_body_when_classified_then_fixed_wording_per_status() {
    let cases = [
        (400, BAD_REQUEST_MESSAGE, ErrorKind::Client),
        (403, FORBIDDEN_MESSAGE, ErrorKind::Client),
        (404, NOT_FOUND_MESSAGE, ErrorKind::Client),
        (409, CONFLICT_MESSAGE, ErrorKind::Client),
        (422, VALIDATION_MESSAGE, ErrorKind::Client),
        (429, RATE_LIMITED_MESSAGE, ErrorKind::RateLimited),
        (500, SERVER_ERROR_MESSAGE, ErrorKind::Server),
        (503, SERVER_ERROR_MESSAGE, ErrorKind::Server),
        (418, UNKNOWN_ERROR_MESSAGE, ErrorKind::Client),
    ];

    for (status, message, kind) in cases {
        let error = classify_response(HttpStatusCode(status), None, None, None);
        assert_eq!(error.status, status);
        assert_eq!(error.message, message, "status {status}");
        assert_eq!(error.kind, kind, "status {status}");
    }
}

#[test]
fn given_server_message_and_detail_when_classified_then_message_wins() {
    let body = json!({"message": "Client already exists", "detail": "duplicate email"});

    let error = classify_response(HttpStatusCode::CONFLICT, Some(&body), None, None);

    assert_eq!(error.message, "Client already exists");
    assert_eq!(error.detail.as_deref(), Some("duplicate email"));
}

#[test]
fn given_only_detail_when_classified_then_detail_becomes_message() {
    let body = json!({"detail": "Not found."});

    let error = classify_response(HttpStatusCode::NOT_FOUND, Some(&body), None, None);

    assert_eq!(error.message, "Not found.");
    assert_eq!(error.detail.as_deref(), Some("Not found."));
}

/// **VALUE**: 429 always shows the rate-limit wording.
///
/// **BUG THIS CATCHES**: Throttle bodies like "Request was throttled. Expected
/// available in 53 seconds." replacing the fixed message.
#[test]
fn given_rate_limited_with_server_body_when_classified_then_fixed_message() {
    let body = json!({"detail": "Request was throttled. Expected available in 53 seconds."});

    let error = classify_response(HttpStatusCode::TOO_MANY_REQUESTS, Some(&body), None, None);

    assert_eq!(error.message, RATE_LIMITED_MESSAGE);
    assert_eq!(error.kind, ErrorKind::RateLimited);
    assert!(error.is_retryable());
}

#[test]
fn given_server_error_with_traceback_body_when_classified_then_generic_message() {
    let body = json!({"message": "IntegrityError at /api/loans/"});

    let error = classify_response(HttpStatusCode(500), Some(&body), None, None);

    assert_eq!(error.message, SERVER_ERROR_MESSAGE);
}

#[test]
fn given_field_error_object_when_classified_then_errors_populated() {
    let body = json!({"email": ["Enter a valid email address."], "phone": ["This field is required."]});

    let error = classify_response(HttpStatusCode::BAD_REQUEST, Some(&body), None, None);

    assert_eq!(error.message, BAD_REQUEST_MESSAGE);
    assert_eq!(error.errors, Some(body));
}

#[test]
fn given_explicit_errors_member_when_classified_then_only_that_member_kept() {
    let body = json!({"message": "Invalid payload", "errors": {"term_months": ["Must be positive"]}});

    let error = classify_response(HttpStatusCode::UNPROCESSABLE_ENTITY, Some(&body), None, None);

    assert_eq!(error.message, "Invalid payload");
    assert_eq!(error.errors, Some(json!({"term_months": ["Must be positive"]})));
}

#[test]
fn given_unauthorized_when_classified_then_auth_expired_and_not_retryable() {
    let error = classify_response(HttpStatusCode::UNAUTHORIZED, None, None, None);

    assert_eq!(error.kind, ErrorKind::AuthExpired);
    assert!(!error.is_retryable());
}

// ============================================
// RELABELLING
// ============================================

#[test]
fn given_refresh_failure_when_into_session_expired_then_kind_and_message_replaced() {
    let error = classify_response(HttpStatusCode(500), None, Some("POST"), None)
        .into_session_expired(SESSION_EXPIRED_REDIRECT_MESSAGE);

    assert_eq!(error.kind, ErrorKind::AuthExpired);
    assert_eq!(error.message, SESSION_EXPIRED_REDIRECT_MESSAGE);
    assert_eq!(error.status, 500);
}

#[test]
fn given_login_rejected_without_detail_when_into_invalid_credentials_then_fixed_message() {
    let error =
        classify_response(HttpStatusCode::UNAUTHORIZED, None, None, None).into_invalid_credentials();

    assert_eq!(error.kind, ErrorKind::Client);
    assert_eq!(error.message, INVALID_CREDENTIALS_MESSAGE);
}

#[test]
fn given_login_rejected_with_detail_when_into_invalid_credentials_then_server_wording_kept() {
    let body = json!({"detail": "No active account found with the given credentials"});
    let error = classify_response(HttpStatusCode::UNAUTHORIZED, Some(&body), None, None)
        .into_invalid_credentials();

    assert_eq!(error.message, "No active account found with the given credentials");
}

#[test]
fn given_structured_error_when_serialized_then_kind_is_snake_case() {
    let error = classify_response(HttpStatusCode::TOO_MANY_REQUESTS, None, None, None);

    let value = serde_json::to_value(&error).expect("serialize");

    assert_eq!(value["kind"], "rate_limited");
    assert_eq!(value["status"], 429);
    assert!(value["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));
}
