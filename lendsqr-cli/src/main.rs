//! Lendsqr CLI - the admin dashboard in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, cache, config, dashboard, generate, logs, serve, user, users};
use lendsqr_core::adapters::generator::DEFAULT_USER_COUNT;

/// Lendsqr - admin dashboard in your terminal
#[derive(Parser)]
#[command(name = "lq", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the console
    Login {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show summary cards and the first page of users
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List users with filters and pagination
    Users {
        #[command(flatten)]
        filters: users::FilterArgs,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Rows per page (10, 25, 50 or 100)
        #[arg(long)]
        per_page: Option<usize>,
        /// Export every filtered row instead of one page (json/csv only)
        #[arg(long)]
        all: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: users::OutputFormat,
    },

    /// Show one user's details
    User {
        /// User id, e.g. LSQ00000001
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the cached user list
    Cache {
        #[command(subcommand)]
        command: cache::CacheCommands,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// Write a mock users dataset
    Generate {
        /// Number of users
        #[arg(long, default_value_t = DEFAULT_USER_COUNT)]
        count: usize,
        /// Random seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Output file
        #[arg(short, long, default_value = "db.json")]
        output: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the mock users API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3001")]
        port: u16,
        /// Number of generated users (ignored with --data)
        #[arg(long, default_value_t = DEFAULT_USER_COUNT)]
        count: usize,
        /// Random seed for generated users
        #[arg(long)]
        seed: Option<u64>,
        /// Serve an existing db.json instead of generating
        #[arg(long)]
        data: Option<PathBuf>,
        /// Artificial response delay in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },

    /// View and manage logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password, json } => auth::run_login(email, password, json),
        Commands::Logout => auth::run_logout(),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Dashboard { json } => dashboard::run(json),
        Commands::Users { filters, page, per_page, all, format } => {
            users::run(filters, page, per_page, all, format)
        }
        Commands::User { id, json } => user::run(&id, json),
        Commands::Cache { command } => cache::run(command),
        Commands::Config { command } => config::run(command),
        Commands::Generate { count, seed, output, json } => generate::run(count, seed, output, json),
        Commands::Serve { port, count, seed, data, delay_ms } => {
            serve::run(port, count, seed, data, delay_ms)
        }
        Commands::Logs { command } => logs::run(command),
    }
}
