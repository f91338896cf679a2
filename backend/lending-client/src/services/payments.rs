use crate::PAYMENTS_ENDPOINT;
use crate::api_client::ApiClient;
use crate::error::ApiClientError;

use common::models::{NewPayment, PaymentReceipt};

impl ApiClient {
    /// Record a payment against an installment. A reused `reference` is
    /// rejected by the backend with 409.
    pub async fn register_payment(
        &self,
        payment: &NewPayment,
    ) -> Result<PaymentReceipt, ApiClientError> {
        self.post(PAYMENTS_ENDPOINT, payment).await
    }
}
