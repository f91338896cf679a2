use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST payments/`.
///
/// `reference` is the idempotency key on the backend: a repeated reference
/// is answered with 409.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPayment {
    pub installment_id: Uuid,
    pub reference: String,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub payment_id: Uuid,
}
