//! Console commands against a mocked backend.

use loan_admin::cli::{ClientAction, Command, LoanAction, LoanTerms, ThemeAction};
use loan_admin::commands::execute;
use loan_admin::error::LoanAdminError;
use loan_admin::paths::AppPaths;
use loan_admin::state::AppState;

use lending_client::{ClientConfig, MemoryStore, Theme};

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/api/", server.uri()),
        session_expired_redirect_delay_ms: 20,
        ..ClientConfig::default()
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/token/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a-1", "refresh": "r-1"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn login() -> Command {
    Command::Login {
        username: "officer".into(),
        password: "s3cret".into(),
    }
}

/// **VALUE**: A session stored by `login` is picked up by the next process.
///
/// **WHY THIS MATTERS**: Each console invocation is a new process; without
/// the file-backed store every command after `login` would be anonymous.
#[tokio::test]
async fn given_login_in_one_process_when_listing_in_next_then_bearer_sent() {
    // GIVEN: a backend and a fresh data directory
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::resolve(
        Some(dir.path().join("config")),
        Some(dir.path().join("data")),
    )
    .unwrap();
    paths.ensure().unwrap();
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/clients/"))
        .and(header("Authorization", "Bearer a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: logging in, then listing from a second state over the same files
    let first = AppState::open(config_for(&server), &paths).unwrap();
    let logged_in = execute(&first, login()).await.unwrap();
    drop(first);

    let second = AppState::open(config_for(&server), &paths).unwrap();
    let listing = execute(&second, Command::Clients { action: ClientAction::List })
        .await
        .unwrap();

    // THEN
    assert_eq!(logged_in, json!({"logged_in": "officer"}));
    assert_eq!(listing, json!([]));
    assert!(second.report().is_empty());
}

/// **VALUE**: When both tokens are dead the command fails as an expired
/// session, the redirect lands before the command returns, and the report
/// tells the operator to sign in again.
#[tokio::test]
async fn given_dead_session_when_listing_loans_then_login_route_and_hint() {
    let server = MockServer::start().await;
    let state = AppState::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "r-1"})))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    execute(&state, login()).await.unwrap();

    let error = execute(&state, Command::Loans { action: LoanAction::List })
        .await
        .unwrap_err();

    assert!(error.is_auth_expired());
    assert!(state.on_login_route());
    let report = state.report();
    assert_eq!(report.len(), 2);
    assert!(report[1].starts_with("Session ended."));
    assert!(!state.client().credentials().is_authenticated().unwrap());
}

#[tokio::test]
async fn given_quote_terms_when_quoting_then_quote_printed() {
    let server = MockServer::start().await;
    let state = AppState::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();
    let quote = json!({
        "monthly_payment": "916.80",
        "total_payment": "11001.60",
        "total_interest": "1001.60"
    });
    Mock::given(method("POST"))
        .and(path("/api/loans/quote/"))
        .and(body_json(json!({
            "principal_amount": "10000.00",
            "currency": "EUR",
            "monthly_rate": "0.0150",
            "term_months": 12
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let printed = execute(
        &state,
        Command::Loans {
            action: LoanAction::Quote {
                terms: LoanTerms {
                    principal: "10000.00".into(),
                    currency: "EUR".into(),
                    rate: "0.0150".into(),
                    term: 12,
                },
            },
        },
    )
    .await
    .unwrap();

    assert_eq!(printed, quote);
}

#[tokio::test]
async fn given_neither_approve_nor_reason_when_deciding_then_app_error_without_request() {
    let server = MockServer::start().await;
    let state = AppState::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();

    let error = execute(
        &state,
        Command::Loans {
            action: LoanAction::Decide {
                loan_id: Uuid::new_v4(),
                approve: false,
                reject: None,
            },
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(error, LoanAdminError::App { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn given_theme_set_when_read_back_then_same_theme() {
    let server = MockServer::start().await;
    let state = AppState::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();

    let default = execute(&state, Command::Theme { action: ThemeAction::Get })
        .await
        .unwrap();
    execute(
        &state,
        Command::Theme {
            action: ThemeAction::Set { theme: Theme::Light },
        },
    )
    .await
    .unwrap();
    let current = execute(&state, Command::Theme { action: ThemeAction::Get })
        .await
        .unwrap();

    assert_eq!(default, json!({"theme": "dark"}));
    assert_eq!(current, json!({"theme": "light"}));
}

#[tokio::test]
async fn given_session_when_logging_out_then_login_route_and_hint() {
    let server = MockServer::start().await;
    let state = AppState::new(config_for(&server), Arc::new(MemoryStore::new())).unwrap();
    mount_login(&server).await;
    execute(&state, login()).await.unwrap();

    let printed = execute(&state, Command::Logout).await.unwrap();

    assert_eq!(printed, json!({"logged_in": false}));
    assert!(state.on_login_route());
    assert_eq!(state.report().len(), 1);
    assert!(state.report()[0].starts_with("Session ended."));
    assert!(!state.client().credentials().is_authenticated().unwrap());
}
