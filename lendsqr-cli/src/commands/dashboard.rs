//! Dashboard command - summary cards and the first page of users

use anyhow::{Context, Result};
use colored::Colorize;
use lendsqr_core::services::{LogEvent, UsersSource};

use super::{get_context, get_logger, log_event, report_fetch, require_auth};
use crate::commands::users::render_table;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let user = require_auth(&ctx, &logger, "dashboard")?;

    let snapshot = match ctx.dashboard_service.load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("dashboard_load_failed")
                    .with_command("dashboard")
                    .with_error(e.to_string()),
            );
            return Err(e).context("Could not load dashboard");
        }
    };
    report_fetch(&snapshot.users, &logger, "dashboard", json);
    if let Some(err) = &snapshot.stats_error {
        log_event(
            &logger,
            LogEvent::new("dashboard_stats_failed")
                .with_command("dashboard")
                .with_error(err.as_str()),
        );
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stats": snapshot.stats,
                "source": snapshot.users.source,
                "users": snapshot.user_list().len(),
            }))?
        );
        return Ok(());
    }

    println!("{}", format!("Welcome back, {}", user.name).bold());
    println!();

    let mut cards = output::create_table();
    cards.set_header(vec!["Users", "Active Users", "Users with Loans", "Users with Savings"]);
    cards.add_row(vec![
        snapshot.stats.total_users.to_string(),
        snapshot.stats.active_users.to_string(),
        snapshot.stats.users_with_loans.to_string(),
        snapshot.stats.users_with_savings.to_string(),
    ]);
    println!("{}", cards);

    let table = ctx.user_table(snapshot.users.users.clone())?;
    println!();
    render_table(&table);

    if snapshot.users.source == UsersSource::Cache {
        if let Ok(Some(cached_at)) = ctx.session.get_users_timestamp() {
            println!(
                "{}",
                format!("Cached at {}", cached_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
            );
        }
    }
    Ok(())
}
