//! CLI command implementations

pub mod auth;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod generate;
pub mod logs;
pub mod serve;
pub mod user;
pub mod users;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use lendsqr_core::services::{EntryPoint, LogEvent, LoggingService, UsersFetch, UsersSource};
use lendsqr_core::{AuthUser, LendsqrContext};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (never blocks a command)
pub fn get_logger() -> Option<LoggingService> {
    get_logger_for(EntryPoint::Cli)
}

pub fn get_logger_for(entry_point: EntryPoint) -> Option<LoggingService> {
    let dir = get_lendsqr_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    LoggingService::new(&dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory: `LENDSQR_DIR` or `~/.lendsqr`
pub fn get_lendsqr_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LENDSQR_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".lendsqr"))
        .ok_or_else(|| anyhow!("Could not find home directory; set LENDSQR_DIR"))
}

pub fn get_context() -> Result<LendsqrContext> {
    let dir = get_lendsqr_dir()?;
    LendsqrContext::new(&dir).context("Failed to initialize lendsqr context")
}

/// Guard for commands behind the login wall
pub fn require_auth(ctx: &LendsqrContext, logger: &Option<LoggingService>, command: &str) -> Result<AuthUser> {
    if ctx.auth_service.is_authenticated() {
        if let Some(user) = ctx.auth_service.get_current_user() {
            return Ok(user);
        }
    }
    log_event(logger, LogEvent::new("auth_required").with_command(command));
    bail!("Not logged in. Run `lq login` first.")
}

/// Fetch the user list and record how it was obtained
///
/// Stale-cache fallbacks are reported on stderr and logged as errors.
pub fn fetch_users(
    ctx: &LendsqrContext,
    logger: &Option<LoggingService>,
    command: &str,
    quiet: bool,
) -> Result<UsersFetch> {
    match ctx.user_service.fetch_users() {
        Ok(fetch) => {
            report_fetch(&fetch, logger, command, quiet);
            Ok(fetch)
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new("users_fetch_failed")
                    .with_command(command)
                    .with_error(e.to_string())
                    .with_error_details(ctx.user_service.api_base_url()),
            );
            Err(e).context("Could not load users")
        }
    }
}

pub fn report_fetch(fetch: &UsersFetch, logger: &Option<LoggingService>, command: &str, quiet: bool) {
    if fetch.source != UsersSource::StaleCache {
        return;
    }
    for warning in &fetch.warnings {
        log_event(
            logger,
            LogEvent::new("users_stale_cache_served")
                .with_command(command)
                .with_error(warning.as_str()),
        );
        if !quiet {
            output::warning(&format!("{} (showing cached data)", warning));
        }
    }
}
