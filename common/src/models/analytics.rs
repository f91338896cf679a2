//! Aggregate portfolio figures returned by `GET analytics/dashboard/`.
//!
//! Every field defaults when absent so an older backend that reports fewer
//! counters still decodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardAnalytics {
    #[serde(default)]
    pub totals: DashboardTotals,
    #[serde(default)]
    pub distributions: DashboardDistributions,
    #[serde(default)]
    pub series: DashboardSeries,
    #[serde(default)]
    pub top_clients: Vec<TopClient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardTotals {
    pub clients: u64,
    pub active_clients: u64,
    pub loans: u64,
    pub principal_sum: String,
    pub delinquent_clients: u64,
    pub delinquent_rate: f64,
    pub total_payments: u64,
    pub total_paid_amount: String,
    pub total_installments: u64,
    pub pending_installments: u64,
    pub paid_installments: u64,
    pub late_installments: u64,
    pub overdue_installments: u64,
    pub avg_loan_amount: String,
    pub clients_with_multiple_loans: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardDistributions {
    pub loans_by_status: BTreeMap<String, u64>,
    pub loans_by_currency: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSeries {
    pub loans_by_month: Vec<MonthlyLoanPoint>,
    pub payments_by_month: Vec<MonthlyPaymentPoint>,
}

/// Loan applications opened in one calendar month.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyLoanPoint {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(rename = "solicitudes", default)]
    pub applications: u64,
    #[serde(rename = "aprobados", default)]
    pub approved: u64,
    #[serde(rename = "rechazados", default)]
    pub rejected: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPaymentPoint {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopClient {
    pub client_id: Uuid,
    pub username: String,
    pub total_amount: String,
    pub loan_count: u64,
}

impl DashboardAnalytics {
    /// Share of loans in the given status, `0.0` when there are no loans.
    pub fn status_share(&self, status: &str) -> f64 {
        let total: u64 = self.distributions.loans_by_status.values().sum();
        if total == 0 {
            return 0.0;
        }
        let count = self
            .distributions
            .loans_by_status
            .get(status)
            .copied()
            .unwrap_or(0);
        count as f64 / total as f64
    }
}
