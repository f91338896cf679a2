//! Payload models exchanged with the lending backend.
//!
//! Monetary amounts and rates stay decimal strings exactly as the backend
//! renders them; converting them to floating point would lose precision.

pub mod analytics;
pub mod auth;
pub mod client;
pub mod loan;
pub mod payment;

pub use analytics::{
    DashboardAnalytics, DashboardDistributions, DashboardSeries, DashboardTotals,
    MonthlyLoanPoint, MonthlyPaymentPoint, TopClient,
};
pub use auth::{Credentials, RefreshedAccess, TokenPair};
pub use client::{Client, ClientStatus, NewClient};
pub use loan::{
    CreatedLoan, DecisionAck, Loan, LoanDecision, LoanQuote, LoanQuoteRequest, LoanStatus,
    NewLoan,
};
pub use payment::{NewPayment, PaymentReceipt};
