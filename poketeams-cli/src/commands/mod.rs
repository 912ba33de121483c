//! CLI command implementations

pub mod account;
pub mod config;
pub mod logs;
pub mod pokemon;
pub mod status;
pub mod team;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use poketeams_core::services::{EntryPoint, LogEvent, LoggingService};
use poketeams_core::{Error as CoreError, PokeTeamsContext, Rejection};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "POKETEAMS_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a failed command
///
/// Only the error category is stored. Messages name teams and Pokémon and
/// stay out of the event log.
pub fn log_failure(logger: &Option<Arc<LoggingService>>, command: &str, err: &anyhow::Error) {
    log_event(
        logger,
        LogEvent::new("command_failed")
            .with_command(command)
            .with_error(error_kind(err)),
    );
}

/// Stable category for an error, taken from the first typed cause in its chain
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                CoreError::Database(_) => "database",
                CoreError::NotFound(_) => "not_found",
                CoreError::Validation(_) => "validation",
                CoreError::Config(_) => "config",
                CoreError::Auth(_) => "auth",
                CoreError::Api(_) => "api",
                CoreError::Io(_) => "io",
                CoreError::Json(_) => "json",
                CoreError::Other(_) => "other",
            };
        }
        if cause.is::<std::io::Error>() {
            return "io";
        }
    }
    if let Some(rejection) = err.downcast_ref::<Rejection>() {
        return match rejection {
            Rejection::TeamNotFound { .. } => "team_not_found",
            Rejection::TeamFull { .. } => "team_full",
            Rejection::MemberNotFound { .. } => "member_not_found",
            Rejection::IndexOutOfRange { .. } => "index_out_of_range",
        };
    }
    "command_error"
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".poketeams"))
}

/// Open the context, wiring team events into the CLI's event log
pub fn get_context(logger: &Option<Arc<LoggingService>>) -> Result<PokeTeamsContext> {
    let data_dir = get_data_dir()?;
    PokeTeamsContext::with_logger(&data_dir, logger.clone())
        .context("Failed to initialize poketeams context")
}
