//! Integration tests for the typed domain calls.

use crate::helpers::{Harness, OLD_ACCESS, REFRESH};

use common::models::{LoanDecision, LoanQuoteRequest, LoanStatus, NewClient, NewLoan, NewPayment};
use lending_client::RetryPolicy;

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

fn analytics_body() -> serde_json::Value {
    json!({
        "totals": {"clients": 12, "loans": 30, "principal_sum": "150000.00", "delinquent_rate": 0.08},
        "distributions": {"loans_by_status": {"approved": 20, "pending": 10}},
        "series": {"loans_by_month": [{"month": "2026-09", "solicitudes": 4, "aprobados": 3, "rechazados": 1}]},
        "top_clients": [{"client_id": Uuid::nil(), "username": "ana", "total_amount": "9000.00", "loan_count": 2}]
    })
}

/// **VALUE**: A created client shows up in the next listing with the same
/// fields.
///
/// **WHY THIS MATTERS**: The clients page refetches after creating; a body
/// sent with the wrong field names would create an empty record silently.
#[tokio::test]
async fn given_created_client_when_fetching_clients_then_listing_contains_it() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    let new_client = NewClient {
        name: "Ana Ruiz".into(),
        email: "ana@example.com".into(),
        phone: "+34 600 000 000".into(),
        address: "Calle Mayor 1".into(),
    };
    let stored = json!({
        "client_id": Uuid::new_v4(),
        "name": new_client.name,
        "email": new_client.email,
        "phone": new_client.phone,
        "address": new_client.address,
        "status": "active",
        "is_delinquent": false
    });
    Mock::given(method("POST"))
        .and(path("/api/clients/"))
        .and(body_json(json!({
            "name": "Ana Ruiz",
            "email": "ana@example.com",
            "phone": "+34 600 000 000",
            "address": "Calle Mayor 1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(stored.clone()))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let created = harness.client.create_client(&new_client).await.expect("created");
    let listing = harness.client.fetch_clients().await.expect("listed");

    assert!(created.matches(&new_client));
    assert!(listing.iter().any(|c| c.matches(&new_client)));
}

#[tokio::test]
async fn given_new_loan_when_created_then_id_and_monthly_payment_returned() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    let loan = NewLoan {
        client_id: Uuid::new_v4(),
        principal_amount: "10000.00".into(),
        currency: "EUR".into(),
        monthly_rate: "0.0150".into(),
        term_months: 12,
    };
    let loan_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/api/loans/"))
        .and(body_json(json!({
            "client_id": loan.client_id,
            "principal_amount": "10000.00",
            "currency": "EUR",
            "monthly_rate": "0.0150",
            "term_months": 12
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"loan_id": loan_id, "monthly_payment": "916.80"})),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let created = harness.client.create_loan(&loan).await.expect("created");

    assert_eq!(created.loan_id, loan_id);
    assert_eq!(created.monthly_payment, "916.80");
}

#[tokio::test]
async fn given_loans_when_fetched_then_statuses_decoded() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/loans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"loan_id": Uuid::new_v4(), "client_id": Uuid::new_v4(), "principal_amount": "500.00",
             "currency": "USD", "monthly_rate": "0.02", "term_months": 6, "status": "approved"},
            {"loan_id": Uuid::new_v4(), "client_id": Uuid::new_v4(), "principal_amount": "900.00",
             "currency": "USD", "monthly_rate": "0.02", "term_months": 6, "status": "disbursed"}
        ])))
        .mount(&harness.server)
        .await;

    let loans = harness.client.fetch_loans().await.expect("listed");

    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0].status, LoanStatus::Approved);
    assert_eq!(loans[1].status, LoanStatus::Unknown);
}

#[tokio::test]
async fn given_quote_request_when_posted_then_quote_decoded() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("POST"))
        .and(path("/api/loans/quote/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "monthly_payment": "916.80",
            "total_payment": "11001.60",
            "total_interest": "1001.60"
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let quote = harness
        .client
        .quote_loan(&LoanQuoteRequest {
            principal_amount: "10000.00".into(),
            currency: "EUR".into(),
            monthly_rate: "0.0150".into(),
            term_months: 12,
        })
        .await
        .expect("quoted");

    assert_eq!(quote.total_interest, "1001.60");
}

#[tokio::test]
async fn given_rejection_when_deciding_loan_then_reason_sent_to_decision_route() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    let loan_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/api/loans/{loan_id}/decision/")))
        .and(body_json(json!({"approve": false, "reason": "income too low"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "rejected"})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let ack = harness
        .client
        .decide_loan(loan_id, &LoanDecision::reject("income too low"))
        .await
        .expect("decided");

    assert_eq!(ack.status, "rejected");
}

#[tokio::test]
async fn given_duplicate_payment_reference_when_registering_then_conflict() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("POST"))
        .and(path("/api/payments/"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "Duplicate payment reference"})),
        )
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .register_payment(&NewPayment {
            installment_id: Uuid::new_v4(),
            reference: "TRX-001".into(),
            amount: "916.80".into(),
            currency: "EUR".into(),
        })
        .await
        .expect_err("duplicate");

    assert_eq!(error.status_code().map(|s| s.as_u16()), Some(409));
    assert_eq!(
        error.structured().map(|e| e.message.as_str()),
        Some("Duplicate payment reference")
    );
}

/// **VALUE**: Analytics recovers from transient 5xx through the retry
/// wrapper.
///
/// **BUG THIS CATCHES**: Backoff that stops after the first failure or
/// ignores `max_attempts`.
#[tokio::test]
async fn given_two_server_errors_when_fetching_analytics_with_retry_then_third_attempt_succeeds() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analytics_body()))
        .expect(1)
        .mount(&harness.server)
        .await;

    let analytics = harness
        .client
        .fetch_dashboard_analytics_with_retry(&fast_retry())
        .await
        .expect("recovered");

    assert_eq!(analytics.totals.loans, 30);
    assert_eq!(analytics.series.loans_by_month[0].approved, 3);
    assert!((analytics.status_share("approved") - 2.0 / 3.0).abs() < f64::EPSILON);
    assert_eq!(harness.published().len(), 2);
}

#[tokio::test]
async fn given_forbidden_when_fetching_analytics_with_retry_then_single_attempt() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&harness.server)
        .await;

    let error = harness
        .client
        .fetch_dashboard_analytics_with_retry(&fast_retry())
        .await
        .expect_err("forbidden");

    assert_eq!(error.status_code().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn given_session_when_logout_then_tokens_cleared_and_login_route() {
    let harness = Harness::start().await;
    harness.seed_session(OLD_ACCESS, REFRESH);

    harness.client.logout().expect("logout");

    assert_eq!(harness.stored("access_token"), None);
    assert_eq!(harness.stored("refresh_token"), None);
    assert_eq!(harness.navigator.routes(), vec!["/login".to_string()]);
}
