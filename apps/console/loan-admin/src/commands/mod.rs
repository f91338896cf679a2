//! Console commands. Each returns a JSON value for the console to print.

pub mod analytics;
pub mod portfolio;
pub mod session;

use crate::cli::{ClientAction, Command, LoanAction, PaymentAction, ThemeAction};
use crate::error::LoanAdminError;
use crate::state::AppState;

use std::time::Duration;

use log::debug;
use serde_json::Value;

/// Grace period on top of the configured redirect delay.
const REDIRECT_GRACE: Duration = Duration::from_millis(50);

pub async fn execute(state: &AppState, command: Command) -> Result<Value, LoanAdminError> {
    let result = dispatch(state, command).await;

    // The redirect after a failed refresh is delayed; let it land before the
    // process reports and exits.
    if let Err(error) = &result
        && error.is_auth_expired()
        && !state.on_login_route()
    {
        debug!("Waiting for session-expired redirect");
        tokio::time::sleep(state.client().config().redirect_delay() + REDIRECT_GRACE).await;
    }

    result
}

async fn dispatch(state: &AppState, command: Command) -> Result<Value, LoanAdminError> {
    match command {
        Command::Login { username, password } => session::login(state, &username, &password).await,
        Command::Logout => session::logout(state),
        Command::Theme { action } => match action {
            ThemeAction::Get => session::theme(state),
            ThemeAction::Set { theme } => session::set_theme(state, theme),
        },
        Command::Clients { action } => match action {
            ClientAction::List => portfolio::list_clients(state).await,
            ClientAction::Create {
                name,
                email,
                phone,
                address,
            } => portfolio::create_client(state, name, email, phone, address).await,
        },
        Command::Loans { action } => match action {
            LoanAction::List => portfolio::list_loans(state).await,
            LoanAction::Create { client_id, terms } => {
                portfolio::create_loan(state, client_id, terms).await
            }
            LoanAction::Quote { terms } => portfolio::quote_loan(state, terms).await,
            LoanAction::Decide {
                loan_id,
                approve,
                reject,
            } => portfolio::decide_loan(state, loan_id, approve, reject).await,
        },
        Command::Payments { action } => match action {
            PaymentAction::Register {
                installment_id,
                reference,
                amount,
                currency,
            } => {
                portfolio::register_payment(state, installment_id, reference, amount, currency)
                    .await
            }
        },
        Command::Analytics { retry } => analytics::dashboard(state, retry).await,
    }
}
