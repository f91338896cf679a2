use crate::error::LoanAdminError;
use crate::state::AppState;

use lending_client::RetryPolicy;

use serde_json::Value;

pub async fn dashboard(state: &AppState, retry: bool) -> Result<Value, LoanAdminError> {
    let client = state.client();
    let analytics = if retry {
        let policy = RetryPolicy::from(&client.config().retry);
        client.fetch_dashboard_analytics_with_retry(&policy).await?
    } else {
        client.fetch_dashboard_analytics().await?
    };
    Ok(serde_json::to_value(analytics)?)
}
