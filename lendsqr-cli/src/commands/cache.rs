//! Cache command - inspect, clear or refresh the cached user list

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use lendsqr_core::services::session::cache_duration;
use lendsqr_core::services::LogEvent;
use lendsqr_core::OperationResult;

use super::{get_context, get_logger, log_event, require_auth};
use crate::output;

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show what is cached and whether it is still fresh
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop the cached list and every cached user record
    Clear,
    /// Clear the cache and fetch the list again
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: CacheCommands) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    match command {
        CacheCommands::Status { json } => {
            let cached_users = ctx
                .session
                .get_users()?
                .and_then(|raw| serde_json::from_str::<Vec<serde_json::Value>>(&raw).ok())
                .map(|list| list.len());
            let cached_at = ctx.session.get_users_timestamp()?;
            let fresh = ctx.session.is_users_cache_valid()?;
            let user_entries = ctx.session.cached_user_ids()?.len();
            let expires_at = cached_at.map(|at| at + cache_duration());

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "cached_users": cached_users,
                        "cached_at": cached_at.map(|t| t.to_rfc3339()),
                        "expires_at": expires_at.map(|t| t.to_rfc3339()),
                        "fresh": fresh,
                        "user_entries": user_entries,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Cache Status".bold());
            match (cached_users, cached_at) {
                (Some(count), Some(at)) => {
                    println!("  Users list: {} records", count);
                    println!("  Cached at: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
                    if fresh {
                        println!("  State: {}", "fresh".green());
                    } else {
                        println!("  State: {} (used only if the API fails)", "stale".yellow());
                    }
                }
                (Some(count), None) => {
                    println!("  Users list: {} records, no timestamp", count);
                    println!("  State: {}", "stale".yellow());
                }
                _ => println!("  Users list: {}", "not cached".dimmed()),
            }
            println!("  User records: {}", user_entries);
        }
        CacheCommands::Clear => {
            ctx.user_service.clear_cache()?;
            log_event(&logger, LogEvent::new("cache_cleared").with_command("cache clear"));
            output::success("Cache cleared.");
        }
        CacheCommands::Refresh { json } => {
            require_auth(&ctx, &logger, "cache refresh")?;
            let result = ctx.user_service.refresh_users().map(|users| users.len());
            match &result {
                Ok(_) => log_event(&logger, LogEvent::new("cache_refreshed").with_command("cache refresh")),
                Err(e) => log_event(
                    &logger,
                    LogEvent::new("cache_refresh_failed")
                        .with_command("cache refresh")
                        .with_error(e.to_string()),
                ),
            }

            if json {
                let report = OperationResult::from(result)
                    .with_context("api", serde_json::json!(ctx.user_service.api_base_url()));
                println!("{}", serde_json::to_string_pretty(&report)?);
                if !report.success {
                    bail!("Refresh failed");
                }
                return Ok(());
            }

            let count = result.context("Refresh failed; the cache is now empty")?;
            output::success(&format!("Fetched {} users.", count));
        }
    }

    Ok(())
}
