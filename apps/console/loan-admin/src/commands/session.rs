use crate::error::LoanAdminError;
use crate::state::AppState;

use lending_client::Theme;

use log::{debug, info};
use serde_json::{Value, json};

pub async fn login(state: &AppState, username: &str, password: &str) -> Result<Value, LoanAdminError> {
    debug!("Logging in as {}", username);
    state.client().login(username, password).await?;
    info!("Session stored for {}", username);
    Ok(json!({ "logged_in": username }))
}

pub fn logout(state: &AppState) -> Result<Value, LoanAdminError> {
    state.client().logout()?;
    Ok(json!({ "logged_in": false }))
}

pub fn theme(state: &AppState) -> Result<Value, LoanAdminError> {
    let theme = state.client().credentials().theme()?;
    Ok(json!({ "theme": theme }))
}

pub fn set_theme(state: &AppState, theme: Theme) -> Result<Value, LoanAdminError> {
    state.client().credentials().set_theme(theme)?;
    info!("Theme set to {}", theme);
    Ok(json!({ "theme": theme }))
}
