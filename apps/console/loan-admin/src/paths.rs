use crate::error::LoanAdminError;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "loan-admin";
pub const SESSION_FILE_NAME: &str = "session.json";
const LOG_DIR_NAME: &str = "logs";

/// Where the console keeps its configuration, session and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Platform directories, each overridable.
    ///
    /// Config lives under `dirs::config_dir()/loan-admin`, session and logs
    /// under `dirs::data_local_dir()/loan-admin`.
    pub fn resolve(
        config_override: Option<PathBuf>,
        data_override: Option<PathBuf>,
    ) -> Result<Self, LoanAdminError> {
        let config_dir = match config_override {
            Some(dir) => dir,
            None => platform_dir(dirs::config_dir(), "configuration")?,
        };
        let data_dir = match data_override {
            Some(dir) => dir,
            None => platform_dir(dirs::data_local_dir(), "local data")?,
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Create every directory the console writes into.
    pub fn ensure(&self) -> Result<(), LoanAdminError> {
        let log_dir = self.log_dir();
        for dir in [self.config_dir.as_path(), self.data_dir.as_path(), log_dir.as_path()] {
            create(dir)?;
        }
        Ok(())
    }
}

#[track_caller]
fn platform_dir(base: Option<PathBuf>, what: &str) -> Result<PathBuf, LoanAdminError> {
    base.map(|dir| dir.join(APP_DIR_NAME)).ok_or_else(|| LoanAdminError::App {
        message: format!("No {what} directory on this platform; pass it explicitly"),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn create(dir: &Path) -> Result<(), LoanAdminError> {
    create_dir_all(dir).map_err(|e| LoanAdminError::App {
        message: format!("Failed to create {}: {e}", dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })
}
