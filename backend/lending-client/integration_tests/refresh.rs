//! Integration tests for 401 recovery through the refresh coordinator.

use crate::helpers::{Harness, NEW_ACCESS, OLD_ACCESS, REFRESH, bearer};

use lending_client::classifier::{
    SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE, SESSION_EXPIRED_MESSAGE, SESSION_EXPIRED_REDIRECT_MESSAGE,
};
use lending_client::{AUTH_REFRESH_ENDPOINT, ErrorKind};

use std::time::Duration;

use futures_util::future::join_all;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const CONCURRENT_CALLS: usize = 5;
const REFRESH_DELAY: Duration = Duration::from_millis(300);

async fn mount_loans_rejecting(harness: &Harness, token: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .and(header("Authorization", bearer(token).as_str()))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Given token not valid for any token type"})),
        )
        .expect(expected)
        .mount(&harness.server)
        .await;
}

async fn mount_loans_accepting(harness: &Harness, token: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .and(header("Authorization", bearer(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(expected)
        .mount(&harness.server)
        .await;
}

/// **VALUE**: A burst of concurrent 401s produces exactly one refresh
/// exchange, and every caller is replayed with the same new token.
///
/// **WHY THIS MATTERS**: Parallel page loads after the access token expires
/// would otherwise fire one refresh each; with rotating refresh tokens all but
/// the first would fail and log the user out.
///
/// **BUG THIS CATCHES**: A pending-refresh slot that is checked and filled
/// non-atomically, or callers that start their own exchange instead of
/// joining the shared one.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_401s_when_refresh_succeeds_then_single_exchange_and_all_replayed() {
    // GIVEN: an expired access token and a slow refresh endpoint
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    mount_loans_rejecting(&harness, OLD_ACCESS, CONCURRENT_CALLS as u64).await;
    mount_loans_accepting(&harness, NEW_ACCESS, CONCURRENT_CALLS as u64).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": REFRESH})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": NEW_ACCESS}))
                .set_delay(REFRESH_DELAY),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    // WHEN: several reads run at once
    let calls = (0..CONCURRENT_CALLS).map(|_| {
        let client = harness.client.clone();
        tokio::spawn(async move { client.fetch_loans().await })
    });
    let results = join_all(calls).await;

    // THEN: all succeed after one exchange, silently
    for result in results {
        let loans = result.expect("task").expect("replayed call succeeds");
        assert!(loans.is_empty());
    }
    assert_eq!(harness.client.refresh_exchange_count(), 1);
    assert_eq!(harness.stored("access_token").as_deref(), Some(NEW_ACCESS));
    assert_eq!(harness.stored("refresh_token").as_deref(), Some(REFRESH));
    assert!(harness.published().is_empty());
    assert!(harness.navigator.routes().is_empty());
}

/// **VALUE**: When the refresh itself fails every waiting caller gets its own
/// original 401, the session is cleared, and the UI is redirected once.
///
/// **BUG THIS CATCHES**: Callers receiving the refresh error instead of their
/// own, one redirect per waiting caller, or tokens left behind after the
/// session is dead.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_401s_when_refresh_fails_then_original_errors_and_one_redirect() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    mount_loans_rejecting(&harness, OLD_ACCESS, CONCURRENT_CALLS as u64).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Token is invalid or expired"}))
                .set_delay(REFRESH_DELAY),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let calls = (0..CONCURRENT_CALLS).map(|_| {
        let client = harness.client.clone();
        tokio::spawn(async move { client.fetch_loans().await })
    });
    let results = join_all(calls).await;

    for result in results {
        let error = result.expect("task").expect_err("refresh failed");
        let structured = error.structured().expect("classified");
        assert_eq!(structured.status, 401);
        assert_eq!(structured.kind, ErrorKind::AuthExpired);
        assert_eq!(structured.message, "Given token not valid for any token type");
        assert!(structured.url.as_deref().is_some_and(|u| u.ends_with("/api/loans/")));
    }

    assert_eq!(harness.client.refresh_exchange_count(), 1);
    assert_eq!(harness.stored("access_token"), None);
    assert_eq!(harness.stored("refresh_token"), None);
    assert_eq!(harness.routes_after_redirect().await, vec!["/login".to_string()]);

    let published = harness.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].message, SESSION_EXPIRED_REDIRECT_MESSAGE);
    assert_eq!(published[0].kind, ErrorKind::AuthExpired);
}

/// **VALUE**: Calling the refresh endpoint through the client never recurses
/// into another refresh.
///
/// **BUG THIS CATCHES**: Infinite refresh loops when the refresh token itself
/// has expired.
#[tokio::test]
async fn given_401_from_refresh_endpoint_when_called_directly_then_no_nested_refresh() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .post::<_, Value>(AUTH_REFRESH_ENDPOINT, &json!({"refresh": REFRESH}))
        .await
        .expect_err("401");

    assert!(error.is_auth_expired());
    assert_eq!(
        error.structured().map(|e| e.message.as_str()),
        Some(SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE)
    );
    assert_eq!(harness.client.refresh_exchange_count(), 0);
}

#[tokio::test]
async fn given_non_401_from_refresh_endpoint_when_called_directly_then_session_expired() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .post::<_, Value>(AUTH_REFRESH_ENDPOINT, &json!({"refresh": REFRESH}))
        .await
        .expect_err("400");

    assert!(error.is_auth_expired());
    let structured = error.structured().expect("classified");
    assert_eq!(structured.status, 400);
    assert_eq!(structured.message, SESSION_EXPIRED_LOGIN_AGAIN_MESSAGE);
    assert_eq!(structured.detail.as_deref(), Some("Token is blacklisted"));
    assert_eq!(harness.client.refresh_exchange_count(), 0);
    assert_eq!(harness.published().len(), 1);
}

/// **VALUE**: A replayed request that is rejected again is not replayed a
/// second time.
///
/// **BUG THIS CATCHES**: A `retried` flag that is never set, turning a
/// permanently forbidden resource into a refresh storm.
#[tokio::test]
async fn given_replay_answered_401_when_dispatched_then_not_retried_again() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    mount_loans_rejecting(&harness, OLD_ACCESS, 1).await;
    mount_loans_rejecting(&harness, NEW_ACCESS, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": NEW_ACCESS})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_loans().await.expect_err("second 401");

    assert_eq!(error.status_code().map(|s| s.as_u16()), Some(401));
    assert_eq!(harness.client.refresh_exchange_count(), 1);
    assert_eq!(harness.published().len(), 1);
}

#[tokio::test]
async fn given_no_refresh_token_when_401_then_session_cleared_and_login_route() {
    let harness = Harness::start().await;
    harness.store_access_only(OLD_ACCESS);
    mount_loans_rejecting(&harness, OLD_ACCESS, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.server)
        .await;

    let error = harness.client.fetch_loans().await.expect_err("expired");

    assert!(error.is_auth_expired());
    assert_eq!(
        error.structured().map(|e| e.message.as_str()),
        Some(SESSION_EXPIRED_MESSAGE)
    );
    assert_eq!(harness.stored("access_token"), None);
    assert_eq!(harness.navigator.routes(), vec!["/login".to_string()]);
    assert_eq!(harness.published().len(), 1);
}

#[tokio::test]
async fn given_rotating_refresh_tokens_when_refreshed_then_new_refresh_token_stored() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    mount_loans_rejecting(&harness, OLD_ACCESS, 1).await;
    mount_loans_accepting(&harness, NEW_ACCESS, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": NEW_ACCESS, "refresh": "refresh-2"})),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    harness.client.fetch_loans().await.expect("replayed");

    assert_eq!(harness.stored("refresh_token").as_deref(), Some("refresh-2"));
}

/// **VALUE**: The replay is a fresh dispatch: new bearer and a new request id.
#[tokio::test]
async fn given_replayed_request_when_inspected_then_new_bearer_and_new_request_id() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    mount_loans_rejecting(&harness, OLD_ACCESS, 1).await;
    mount_loans_accepting(&harness, NEW_ACCESS, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": NEW_ACCESS})))
        .mount(&harness.server)
        .await;

    harness.client.fetch_loans().await.expect("replayed");

    let requests = harness.server.received_requests().await.expect("recording on");
    let loan_requests: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/loans/")
        .collect();
    assert_eq!(loan_requests.len(), 2);

    let ids: Vec<_> = loan_requests
        .iter()
        .map(|r| r.headers.get("x-request-id").expect("request id").clone())
        .collect();
    assert_ne!(ids[0], ids[1]);
    assert_eq!(
        loan_requests[1].headers.get("authorization").map(|v| v.as_bytes()),
        Some(bearer(NEW_ACCESS).as_bytes())
    );

    let refresh_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/token/refresh/")
        .expect("refresh sent");
    assert!(refresh_request.headers.get("authorization").is_none());
    assert!(refresh_request.headers.get("x-request-id").is_some());
}
