//! Console logging, initialized once.
//!
//! stdout carries command output, so the terminal copy of the log goes to
//! stderr. The file copy under the data directory keeps source positions for
//! every line; the terminal copy drops them and shows which crate logged.
//! Outbound calls log their `X-Request-ID`, which is what ties a line here to
//! the backend's own request log.

use crate::error::LoanAdminError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339_millis;
use log::{LevelFilter, Record, info, warn};

static INIT_LOGGER_ONCE: Once = Once::new();
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "loan-admin.log";

/// Overrides the build's default level, e.g. `LOAN_ADMIN_LOG=trace`.
pub const LOG_LEVEL_ENV_VAR: &str = "LOAN_ADMIN_LOG";

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the stderr + file logger.
///
/// Later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns [`LoanAdminError::App`] if the log file cannot be created or the
/// global logger cannot be installed.
pub fn initialize(log_dir: &Path) -> Result<(), LoanAdminError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized");
        return Ok(());
    }

    let level = resolve_level(std::env::var(LOG_LEVEL_ENV_VAR).ok().as_deref());
    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("Logging at {level:?} to {}", log_dir.join(LOG_FILE_NAME).display());
        }
    });

    result
}

/// Level from `LOAN_ADMIN_LOG`, falling back to the build default when unset
/// or unparseable.
pub(crate) fn resolve_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

#[track_caller]
pub(crate) fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), LoanAdminError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = fern::log_file(&log_file_path).map_err(|e| LoanAdminError::App {
        message: format!("Failed to create log file {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let terminal = Dispatch::new()
        .format(move |out, message, record| {
            write_line(out, message, record, colors.color(record.level()), false)
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| write_line(out, message, record, record.level(), true))
        .chain(log_file);

    Dispatch::new()
        .level(level)
        // connection pool chatter buries the request lines
        .level_for("hyper", LevelFilter::Info)
        .level_for("hyper_util", LevelFilter::Info)
        .level_for("reqwest", LevelFilter::Info)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(|e| LoanAdminError::App {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}

fn write_line(
    out: FormatCallback,
    message: &std::fmt::Arguments,
    record: &Record,
    level: impl std::fmt::Display,
    with_source: bool,
) {
    let date = format_rfc3339_millis(SystemTime::now());
    let origin = crate_of(record.target());
    if with_source {
        out.finish(format_args!(
            "[{date} {level} {origin}] {message} [{}:{}]",
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
        ))
    } else {
        out.finish(format_args!("[{date} {level} {origin}] {message}"))
    }
}

/// `lending_client::api_client::refresh` -> `lending_client`.
pub(crate) fn crate_of(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}
