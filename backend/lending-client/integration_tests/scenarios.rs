//! End-to-end session scenarios: login, silent refresh, and expiry.

use crate::helpers::{Harness, NEW_ACCESS, OLD_ACCESS, REFRESH, bearer};

use lending_client::ErrorKind;

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

fn loan_listing() -> serde_json::Value {
    json!([{
        "loan_id": "6f1c1f0e-3b7a-4c55-9d0e-2f6a4b0c9e11",
        "client_id": "0b8f3d2a-1c4e-4a7b-8e9f-5d6c7b8a9f00",
        "principal_amount": "2500.00",
        "currency": "USD",
        "monthly_rate": "0.0200",
        "term_months": 10,
        "status": "pending"
    }])
}

/// **VALUE**: Login stores both tokens and the next call carries the bearer.
#[tokio::test]
async fn given_valid_credentials_when_login_then_loans_fetched_with_authorization() {
    // GIVEN
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .and(body_json(json!({"username": "officer", "password": "s3cret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": OLD_ACCESS, "refresh": REFRESH})),
        )
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .and(header("Authorization", bearer(OLD_ACCESS).as_str()))
        .and(header_exists("X-Request-ID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(loan_listing()))
        .expect(1)
        .mount(&harness.server)
        .await;

    // WHEN
    harness
        .client
        .login("officer", "s3cret")
        .await
        .expect("logged in");
    let loans = harness.client.fetch_loans().await.expect("loans");

    // THEN
    assert_eq!(harness.stored("access_token").as_deref(), Some(OLD_ACCESS));
    assert_eq!(harness.stored("refresh_token").as_deref(), Some(REFRESH));
    assert!(harness.client.credentials().is_authenticated().expect("store"));
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].term_months, 10);
}

/// **VALUE**: An expired access token is refreshed behind the caller's back:
/// one 401, one refresh, one successful replay, nothing published.
///
/// **BUG THIS CATCHES**: Recoverable 401s flashing a session banner, or the
/// caller seeing the 401 at all.
#[tokio::test]
async fn given_expired_access_and_valid_refresh_when_fetching_loans_then_transparent_success() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .and(header("Authorization", bearer(OLD_ACCESS).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": REFRESH})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": NEW_ACCESS})))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .and(header("Authorization", bearer(NEW_ACCESS).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(loan_listing()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let loans = harness.client.fetch_loans().await.expect("transparent refresh");

    assert_eq!(loans.len(), 1);
    assert_eq!(harness.client.refresh_exchange_count(), 1);
    assert!(harness.published().is_empty());
    assert!(harness.navigator.routes().is_empty());
}

/// **VALUE**: With both tokens rejected the call fails as an expired session
/// and the UI lands on the login route.
#[tokio::test]
async fn given_both_tokens_invalid_when_fetching_loans_then_auth_expired_and_login_redirect() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_loans().await.expect_err("expired");

    assert_eq!(error.kind(), Some(ErrorKind::AuthExpired));
    assert!(!harness.client.credentials().is_authenticated().expect("store"));
    assert_eq!(harness.routes_after_redirect().await, vec!["/login".to_string()]);
}
