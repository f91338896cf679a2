// Unit tests for backend payload models

use crate::models::{
    Client, ClientStatus, DashboardAnalytics, LoanDecision, LoanStatus, NewClient, TokenPair,
};

use serde_json::json;

#[test]
fn given_login_payload_when_decoded_then_both_tokens_present() {
    let pair: TokenPair =
        serde_json::from_value(json!({"access": "a-token", "refresh": "r-token"})).unwrap();

    assert_eq!(pair.access.as_str(), "a-token");
    assert_eq!(pair.refresh.as_str(), "r-token");
}

/// **VALUE**: The backend may add client statuses before this crate learns them.
///
/// **BUG THIS CATCHES**: Would catch removing `#[serde(other)]`, which turns an
/// unknown status into a decode failure for the whole client list.
#[test]
fn given_unknown_status_when_decoding_client_then_maps_to_unknown() {
    let client: Client = serde_json::from_value(json!({
        "client_id": "7a0e7c8e-9f8e-4b55-9a51-0d8a1f6b5d11",
        "name": "Ana Torres",
        "email": "ana@example.com",
        "phone": "555-0101",
        "address": "Calle 1",
        "status": "archived",
        "is_delinquent": false
    }))
    .unwrap();

    assert_eq!(client.status, Some(ClientStatus::Unknown));
}

#[test]
fn given_created_client_when_compared_with_submission_then_matches_ignoring_email_case() {
    let submitted = NewClient {
        name: "Ana Torres".to_string(),
        email: "Ana@Example.com".to_string(),
        phone: "555-0101".to_string(),
        address: "Calle 1".to_string(),
    };
    let stored: Client = serde_json::from_value(json!({
        "client_id": "7a0e7c8e-9f8e-4b55-9a51-0d8a1f6b5d11",
        "name": "Ana Torres",
        "email": "ana@example.com",
        "phone": "555-0101",
        "address": "Calle 1",
        "is_delinquent": false
    }))
    .unwrap();

    assert!(stored.matches(&submitted));
}

#[test]
fn given_approval_when_serialized_then_omits_reason() {
    let body = serde_json::to_value(LoanDecision::approve()).unwrap();

    assert_eq!(body, json!({"approve": true}));
}

#[test]
fn given_loan_status_strings_when_decoded_then_lowercase_variants_match() {
    let statuses: Vec<LoanStatus> =
        serde_json::from_value(json!(["pending", "approved", "rejected", "cancelled", "frozen"]))
            .unwrap();

    assert_eq!(
        statuses,
        vec![
            LoanStatus::Pending,
            LoanStatus::Approved,
            LoanStatus::Rejected,
            LoanStatus::Cancelled,
            LoanStatus::Unknown
        ]
    );
}

#[test]
fn given_dashboard_payload_when_decoded_then_spanish_series_keys_map() {
    let analytics: DashboardAnalytics = serde_json::from_value(json!({
        "totals": {"clients": 4, "loans": 3, "principal_sum": "4500.00", "delinquent_rate": 0.25},
        "distributions": {
            "loans_by_status": {"approved": 1, "pending": 2},
            "loans_by_currency": {"USD": 3}
        },
        "series": {
            "loans_by_month": [
                {"month": "2026-09-01", "solicitudes": 3, "aprobados": 1, "rechazados": 0}
            ],
            "payments_by_month": []
        },
        "top_clients": []
    }))
    .unwrap();

    assert_eq!(analytics.totals.clients, 4);
    assert_eq!(analytics.series.loans_by_month[0].applications, 3);
    assert_eq!(analytics.series.loans_by_month[0].approved, 1);
    assert!((analytics.status_share("pending") - 2.0 / 3.0).abs() < f64::EPSILON);
    assert_eq!(analytics.status_share("cancelled"), 0.0);
}
