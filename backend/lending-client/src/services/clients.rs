use crate::CLIENTS_ENDPOINT;
use crate::api_client::ApiClient;
use crate::error::ApiClientError;

use common::models::{Client, NewClient};

impl ApiClient {
    pub async fn fetch_clients(&self) -> Result<Vec<Client>, ApiClientError> {
        self.get(CLIENTS_ENDPOINT).await
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client, ApiClientError> {
        self.post(CLIENTS_ENDPOINT, client).await
    }
}
