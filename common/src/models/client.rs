use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Suspended,
    #[serde(other)]
    Unknown,
}

/// A borrower as listed by `GET clients/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub client_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub is_delinquent: bool,
}

impl Client {
    /// True when every submitted field is reflected in this record.
    pub fn matches(&self, submitted: &NewClient) -> bool {
        self.name == submitted.name
            && self.email.eq_ignore_ascii_case(&submitted.email)
            && self.phone == submitted.phone
            && self.address == submitted.address
    }
}

/// Body of `POST clients/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}
