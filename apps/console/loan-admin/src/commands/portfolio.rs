use crate::cli::LoanTerms;
use crate::error::LoanAdminError;
use crate::state::AppState;

use common::models::{LoanDecision, LoanQuoteRequest, NewClient, NewLoan, NewPayment};

use log::info;
use serde_json::Value;
use uuid::Uuid;

impl From<LoanTerms> for LoanQuoteRequest {
    fn from(terms: LoanTerms) -> Self {
        Self {
            principal_amount: terms.principal,
            currency: terms.currency,
            monthly_rate: terms.rate,
            term_months: terms.term,
        }
    }
}

pub async fn list_clients(state: &AppState) -> Result<Value, LoanAdminError> {
    let clients = state.client().fetch_clients().await?;
    info!("{} clients", clients.len());
    Ok(serde_json::to_value(clients)?)
}

pub async fn create_client(
    state: &AppState,
    name: String,
    email: String,
    phone: String,
    address: String,
) -> Result<Value, LoanAdminError> {
    let client = NewClient {
        name,
        email,
        phone,
        address,
    };
    let created = state.client().create_client(&client).await?;
    info!("Created client {}", created.client_id);
    Ok(serde_json::to_value(created)?)
}

pub async fn list_loans(state: &AppState) -> Result<Value, LoanAdminError> {
    let loans = state.client().fetch_loans().await?;
    info!("{} loans", loans.len());
    Ok(serde_json::to_value(loans)?)
}

pub async fn create_loan(
    state: &AppState,
    client_id: Uuid,
    terms: LoanTerms,
) -> Result<Value, LoanAdminError> {
    let loan = NewLoan {
        client_id,
        principal_amount: terms.principal,
        currency: terms.currency,
        monthly_rate: terms.rate,
        term_months: terms.term,
    };
    let created = state.client().create_loan(&loan).await?;
    info!("Created loan {}", created.loan_id);
    Ok(serde_json::to_value(created)?)
}

pub async fn quote_loan(state: &AppState, terms: LoanTerms) -> Result<Value, LoanAdminError> {
    let quote = state.client().quote_loan(&terms.into()).await?;
    Ok(serde_json::to_value(quote)?)
}

/// `approve` and `reject` are mutually exclusive; exactly one is required.
pub async fn decide_loan(
    state: &AppState,
    loan_id: Uuid,
    approve: bool,
    reject: Option<String>,
) -> Result<Value, LoanAdminError> {
    let decision = match (approve, reject) {
        (true, None) => LoanDecision::approve(),
        (false, Some(reason)) if !reason.trim().is_empty() => LoanDecision::reject(reason),
        _ => {
            return Err(LoanAdminError::app(
                "pass either --approve or --reject <reason>",
            ));
        }
    };
    let ack = state.client().decide_loan(loan_id, &decision).await?;
    info!("Loan {} is now {}", loan_id, ack.status);
    Ok(serde_json::to_value(ack)?)
}

pub async fn register_payment(
    state: &AppState,
    installment_id: Uuid,
    reference: String,
    amount: String,
    currency: String,
) -> Result<Value, LoanAdminError> {
    let payment = NewPayment {
        installment_id,
        reference,
        amount,
        currency,
    };
    let receipt = state.client().register_payment(&payment).await?;
    info!("Payment {} registered", receipt.payment_id);
    Ok(serde_json::to_value(receipt)?)
}
