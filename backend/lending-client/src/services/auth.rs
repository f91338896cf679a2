use crate::AUTH_TOKEN_ENDPOINT;
use crate::api_client::{ApiClient, AuthMode};
use crate::error::ApiClientError;
use crate::storage::Session;

use common::models::{Credentials, TokenPair};

use log::info;
use reqwest::Method;

impl ApiClient {
    /// Exchange credentials for a token pair and store both tokens.
    ///
    /// Sent without a bearer header; a 401 is reported as invalid credentials
    /// and never triggers a refresh.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, ApiClientError> {
        let body = serde_json::to_value(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })?;

        let tokens: TokenPair = self
            .send(Method::POST, AUTH_TOKEN_ENDPOINT, Some(body), AuthMode::Anonymous)
            .await?;

        self.credentials().store_session(&Session {
            access: tokens.access.clone(),
            refresh: tokens.refresh.clone(),
        })?;
        info!("Logged in as {}", username);

        Ok(tokens)
    }

    /// Clear both tokens and send the UI to the login route.
    pub fn logout(&self) -> Result<(), ApiClientError> {
        self.credentials().clear()?;
        info!("Logged out");
        self.navigator().navigate(&self.config().login_route);
        Ok(())
    }
}
