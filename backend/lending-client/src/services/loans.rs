use crate::api_client::ApiClient;
use crate::error::ApiClientError;
use crate::{LOAN_QUOTE_ENDPOINT, LOANS_ENDPOINT};

use common::models::{
    CreatedLoan, DecisionAck, Loan, LoanDecision, LoanQuote, LoanQuoteRequest, NewLoan,
};

use uuid::Uuid;

impl ApiClient {
    pub async fn fetch_loans(&self) -> Result<Vec<Loan>, ApiClientError> {
        self.get(LOANS_ENDPOINT).await
    }

    /// Open a loan application. The backend answers with the new id and the
    /// computed monthly installment.
    pub async fn create_loan(&self, loan: &NewLoan) -> Result<CreatedLoan, ApiClientError> {
        self.post(LOANS_ENDPOINT, loan).await
    }

    /// Installment simulation; nothing is persisted.
    pub async fn quote_loan(
        &self,
        request: &LoanQuoteRequest,
    ) -> Result<LoanQuote, ApiClientError> {
        self.post(LOAN_QUOTE_ENDPOINT, request).await
    }

    pub async fn decide_loan(
        &self,
        loan_id: Uuid,
        decision: &LoanDecision,
    ) -> Result<DecisionAck, ApiClientError> {
        self.post(&format!("{LOANS_ENDPOINT}{loan_id}/decision/"), decision).await
    }
}
