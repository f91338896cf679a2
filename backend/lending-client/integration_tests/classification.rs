//! Integration tests for failure classification and publishing over real HTTP.

use crate::helpers::{Harness, OLD_ACCESS, REFRESH, bearer, config_for};

use lending_client::classifier::{
    INVALID_CREDENTIALS_MESSAGE, NETWORK_MESSAGE, RATE_LIMITED_MESSAGE, TIMEOUT_MESSAGE,
};
use lending_client::{ApiClientError, ErrorKind};

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: An unreachable backend yields status 0 with the connectivity
/// message, and the banner hears about it.
///
/// **BUG THIS CATCHES**: Connection errors surfacing as `Http` client errors
/// that subscribers never see.
#[tokio::test]
async fn given_unreachable_backend_when_fetching_then_status_zero_and_published() {
    // Port 9 (discard) on loopback is closed in test environments.
    let server = MockServer::start().await;
    let harness = Harness::with_server(server, config_for("http://127.0.0.1:9/api/"));

    let error = harness.client.fetch_clients().await.expect_err("no backend");

    let structured = error.structured().expect("classified");
    assert_eq!(structured.status, 0);
    assert_eq!(structured.message, NETWORK_MESSAGE);
    assert_eq!(structured.kind, ErrorKind::Network);
    assert!(error.is_retryable());
    assert_eq!(harness.published(), vec![structured.clone()]);
}

#[tokio::test]
async fn given_slow_backend_when_timeout_elapses_then_timeout_message() {
    let server = MockServer::start().await;
    let mut config = config_for(&format!("{}/api/", server.uri()));
    config.request_timeout_secs = 1;
    Mock::given(method("GET"))
        .and(path("/api/clients/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;
    let harness = Harness::with_server(server, config);

    let error = harness.client.fetch_clients().await.expect_err("timeout");

    let structured = error.structured().expect("classified");
    assert_eq!(structured.status, 0);
    assert_eq!(structured.message, TIMEOUT_MESSAGE);
}

/// **VALUE**: The rate-limit banner wording does not depend on what the
/// server put in the body.
#[tokio::test]
async fn given_429_with_body_when_fetching_then_fixed_rate_limit_message() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard/"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"detail": "Request was throttled.", "message": "slow down"})),
        )
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .fetch_dashboard_analytics()
        .await
        .expect_err("throttled");

    let structured = error.structured().expect("classified");
    assert_eq!(structured.message, RATE_LIMITED_MESSAGE);
    assert_eq!(structured.kind, ErrorKind::RateLimited);
    assert_eq!(structured.detail.as_deref(), Some("Request was throttled."));
}

#[tokio::test]
async fn given_validation_failure_when_creating_client_then_field_errors_exposed() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    let field_errors = json!({"email": ["client with this email already exists."]});
    Mock::given(method("POST"))
        .and(path("/api/clients/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(field_errors.clone()))
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .create_client(&common::models::NewClient {
            name: "Ana Ruiz".into(),
            email: "ana@example.com".into(),
            phone: String::new(),
            address: String::new(),
        })
        .await
        .expect_err("duplicate");

    let structured = error.structured().expect("classified");
    assert_eq!(structured.status, 400);
    assert_eq!(structured.kind, ErrorKind::Client);
    assert_eq!(structured.errors, Some(field_errors));
    assert_eq!(structured.method.as_deref(), Some("POST"));
}

#[tokio::test]
async fn given_stored_token_when_fetching_then_bearer_and_request_id_headers_sent() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/clients/"))
        .and(header("Authorization", bearer(OLD_ACCESS).as_str()))
        .and(header_exists("X-Request-ID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let clients = harness.client.fetch_clients().await.expect("authorized");

    assert!(clients.is_empty());
}

#[tokio::test]
async fn given_no_stored_token_when_fetching_then_no_authorization_header() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clients/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&harness.server)
        .await;

    harness.client.fetch_clients().await.expect("open endpoint");

    let requests = harness.server.received_requests().await.expect("recording on");
    assert!(requests[0].headers.get("authorization").is_none());
}

/// **VALUE**: A rejected login is reported as bad credentials and never
/// attempts a refresh, even with a stale session in the store.
///
/// **BUG THIS CATCHES**: Login 401s routed through refresh recovery, which
/// clears the stale session and redirects away from the login form.
#[tokio::test]
async fn given_wrong_password_when_login_then_invalid_credentials_without_refresh() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .login("officer", "wrong")
        .await
        .expect_err("rejected");

    let structured = error.structured().expect("classified");
    assert_eq!(structured.message, INVALID_CREDENTIALS_MESSAGE);
    assert_eq!(structured.kind, ErrorKind::Client);
    assert_eq!(harness.client.refresh_exchange_count(), 0);
    assert!(harness.navigator.routes().is_empty());

    let requests = harness.server.received_requests().await.expect("recording on");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn given_unexpected_payload_when_decoding_then_json_error_not_published() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_loans().await.expect_err("wrong shape");

    assert!(matches!(error, ApiClientError::Json { .. }));
    assert!(harness.published().is_empty());
}
