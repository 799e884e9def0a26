//! Serve command - run the mock users API locally

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use lendsqr_core::adapters::generator::{generate_users, read_dataset};
use lendsqr_core::adapters::mock_server::{MockApiServer, MockConfig};
use lendsqr_core::services::{EntryPoint, LogEvent};

use super::generate::seed_or_now;
use super::{get_logger_for, log_event};

pub fn run(
    port: u16,
    count: usize,
    seed: Option<u64>,
    data: Option<PathBuf>,
    delay_ms: u64,
) -> Result<()> {
    let logger = get_logger_for(EntryPoint::Server);

    let users = match &data {
        Some(path) => read_dataset(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?,
        None => generate_users(count, seed_or_now(seed)),
    };

    let config = MockConfig {
        delay_ms,
        ..Default::default()
    };
    let server = match MockApiServer::start_on_port(port, users, config) {
        Ok(server) => server,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("server_start_failed")
                    .with_command("serve")
                    .with_error(e.to_string()),
            );
            return Err(e).with_context(|| format!("Failed to bind port {}", port));
        }
    };
    log_event(&logger, LogEvent::new("server_started").with_command("serve"));

    let base = server.base_url();
    println!("{}", "Lendsqr Mock API".bold());
    println!("  Users:  {}/users ({} records)", base, server.user_count());
    println!("  Health: {}/health", base);
    println!("{}", "Press Ctrl+C to stop.".dimmed());

    server.join();
    Ok(())
}
