use loan_admin::cli::Cli;
use loan_admin::commands;
use loan_admin::error::LoanAdminError;
use loan_admin::logger::initialize as LoggerInitialize;
use loan_admin::paths::AppPaths;
use loan_admin::state::AppState;

use lending_client::ClientConfig;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            match serde_json::to_string_pretty(&e) {
                Ok(rendered) => eprintln!("{rendered}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LoanAdminError> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve(cli.config_dir.clone(), cli.data_dir.clone())?;
    paths.ensure()?;

    // Initialize logger FIRST
    LoggerInitialize(&paths.log_dir())?;
    info!("Loan admin console starting");
    info!("Log directory: {}", paths.log_dir().display());

    let mut config = ClientConfig::load(&paths.config_dir)?.with_env_overrides()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    info!("Backend: {}", config.base_url);

    let state = AppState::open(config, &paths)?;
    let outcome = commands::execute(&state, cli.command).await;

    for line in state.report() {
        eprintln!("{line}");
    }

    let value = outcome?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
