use super::retry::{RetryPolicy, retry_idempotent};
use crate::DASHBOARD_ANALYTICS_ENDPOINT;
use crate::api_client::ApiClient;
use crate::error::ApiClientError;

use common::models::DashboardAnalytics;

impl ApiClient {
    pub async fn fetch_dashboard_analytics(&self) -> Result<DashboardAnalytics, ApiClientError> {
        self.get(DASHBOARD_ANALYTICS_ENDPOINT).await
    }

    /// Same read, retried on network errors, 429 and 5xx.
    pub async fn fetch_dashboard_analytics_with_retry(
        &self,
        policy: &RetryPolicy,
    ) -> Result<DashboardAnalytics, ApiClientError> {
        retry_idempotent(policy, || self.fetch_dashboard_analytics()).await
    }
}
