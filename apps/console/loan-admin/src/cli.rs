//! Command line surface of the console.

use lending_client::Theme;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "loan-admin")]
#[command(author, version, about = "Operator console for the lending backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend API base URL (overrides config and LOAN_ADMIN_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding config.json
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory holding the session file and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Manage borrowers
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage loans
    Loans {
        #[command(subcommand)]
        action: LoanAction,
    },

    /// Record payments
    Payments {
        #[command(subcommand)]
        action: PaymentAction,
    },

    /// Portfolio dashboard figures
    Analytics {
        /// Retry transient failures with backoff
        #[arg(long)]
        retry: bool,
    },

    /// UI theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientAction {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },
}

/// Loan terms shared by `create` and `quote`.
#[derive(Debug, Clone, Args)]
pub struct LoanTerms {
    /// Principal as a decimal string, e.g. 10000.00
    #[arg(long)]
    pub principal: String,
    #[arg(long, default_value = "USD")]
    pub currency: String,
    /// Monthly interest rate as a decimal string, e.g. 0.0150
    #[arg(long)]
    pub rate: String,
    /// Term in months
    #[arg(long)]
    pub term: u32,
}

#[derive(Debug, Subcommand)]
pub enum LoanAction {
    List,
    Create {
        #[arg(long)]
        client_id: Uuid,
        #[command(flatten)]
        terms: LoanTerms,
    },
    /// Simulate installments without creating anything
    Quote {
        #[command(flatten)]
        terms: LoanTerms,
    },
    /// Approve or reject an application
    Decide {
        loan_id: Uuid,
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        /// Rejection reason
        #[arg(long)]
        reject: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentAction {
    Register {
        #[arg(long)]
        installment_id: Uuid,
        /// Unique payment reference; reusing one is rejected
        #[arg(long)]
        reference: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "USD")]
        currency: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    Get,
    Set { theme: Theme },
}
