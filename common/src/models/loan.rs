use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A loan as listed by `GET loans/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub loan_id: Uuid,
    pub client_id: Uuid,
    pub principal_amount: String,
    pub currency: String,
    pub monthly_rate: String,
    pub term_months: u32,
    pub status: LoanStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST loans/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewLoan {
    pub client_id: Uuid,
    pub principal_amount: String,
    pub currency: String,
    pub monthly_rate: String,
    pub term_months: u32,
}

/// Response of `POST loans/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedLoan {
    pub loan_id: Uuid,
    pub monthly_payment: String,
}

/// Body of `POST loans/quote/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanQuoteRequest {
    pub principal_amount: String,
    pub currency: String,
    pub monthly_rate: String,
    pub term_months: u32,
}

impl From<&NewLoan> for LoanQuoteRequest {
    fn from(loan: &NewLoan) -> Self {
        Self {
            principal_amount: loan.principal_amount.clone(),
            currency: loan.currency.clone(),
            monthly_rate: loan.monthly_rate.clone(),
            term_months: loan.term_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanQuote {
    pub monthly_payment: String,
    pub total_payment: String,
    pub total_interest: String,
}

/// Body of `POST loans/{id}/decision/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanDecision {
    pub approve: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LoanDecision {
    pub fn approve() -> Self {
        Self {
            approve: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            approve: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionAck {
    pub status: String,
}
