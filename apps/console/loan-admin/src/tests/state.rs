// Unit tests for console state: route tracking and the post-command report

use crate::state::{AppState, RouteTracker};

use lending_client::classifier::{SESSION_EXPIRED_REDIRECT_MESSAGE, classify_response};
use lending_client::{ClientConfig, MemoryStore, Navigator};

use common::HttpStatusCode;

use std::sync::Arc;

use serde_json::json;

fn state() -> AppState {
    AppState::new(ClientConfig::default(), Arc::new(MemoryStore::new())).unwrap()
}

#[test]
fn given_new_tracker_when_inspected_then_starts_at_root() {
    let routes = RouteTracker::new();

    assert_eq!(routes.current(), "/");
    assert_eq!(routes.history(), vec!["/".to_string()]);
}

#[test]
fn given_navigation_when_tracked_then_history_in_order() {
    let routes = RouteTracker::new();

    routes.navigate("/clients");
    routes.navigate("/login");

    assert_eq!(routes.current(), "/login");
    assert_eq!(routes.history(), vec!["/", "/clients", "/login"]);
}

#[tokio::test]
async fn given_quiet_command_when_reporting_then_nothing_to_show() {
    let state = state();

    assert!(state.report().is_empty());
    assert!(!state.on_login_route());
}

/// **VALUE**: A published failure shows up as a banner line with its level,
/// and the server's detail when it adds something.
#[tokio::test]
async fn given_published_failure_when_reporting_then_banner_line() {
    let state = state();
    let failure = classify_response(
        HttpStatusCode::from(409),
        Some(&json!({"message": "Payment rejected", "detail": "Duplicate payment reference"})),
        Some("POST"),
        None,
    );

    state.client().notifier().publish(&failure);

    let report = state.report();
    assert_eq!(report.len(), 1);
    assert_eq!(
        report[0],
        "[WARNING] Payment rejected (Duplicate payment reference)"
    );
}

#[tokio::test]
async fn given_session_ended_when_reporting_then_sign_in_hint_last() {
    let state = state();
    let expired = classify_response(HttpStatusCode::from(401), None, Some("GET"), None)
        .into_session_expired(SESSION_EXPIRED_REDIRECT_MESSAGE);

    state.client().notifier().publish(&expired);
    state.routes().navigate("/login");

    let report = state.report();
    assert!(state.on_login_route());
    assert_eq!(report.len(), 2);
    assert!(report[0].contains(SESSION_EXPIRED_REDIRECT_MESSAGE));
    assert!(report[1].starts_with("Session ended."));
}
