//! Config command - show or change settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use lendsqr_core::config::{validate_api_url, BuildMode, Config, SETTINGS_FILE};
use lendsqr_core::services::{LogEvent, PER_PAGE_OPTIONS};

use super::{get_lendsqr_dir, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings (file plus environment)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change settings and write them to settings.json
    Set {
        /// development or production
        #[arg(long)]
        mode: Option<String>,
        /// Users API base URL
        #[arg(long, conflicts_with = "reset_api_url")]
        api_url: Option<String>,
        /// Go back to the mode's default API URL
        #[arg(long)]
        reset_api_url: bool,
        /// Default rows per page
        #[arg(long)]
        per_page: Option<usize>,
        /// Simulated login delay in milliseconds
        #[arg(long)]
        login_delay_ms: Option<u64>,
    },
}

/// Requested changes to the saved settings
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub mode: Option<String>,
    pub api_url: Option<String>,
    pub reset_api_url: bool,
    pub per_page: Option<usize>,
    pub login_delay_ms: Option<u64>,
}

/// Apply `changes`, validating each value; returns the warnings to show
pub fn apply_changes(config: &mut Config, changes: ConfigChanges) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if let Some(mode) = changes.mode {
        config.mode = mode.parse::<BuildMode>()?;
    }
    if let Some(url) = changes.api_url {
        let url = url.trim().trim_end_matches('/').to_string();
        validate_api_url(&url)?;
        config.api_base_url = Some(url);
    }
    if changes.reset_api_url {
        config.api_base_url = None;
    }
    if let Some(per_page) = changes.per_page {
        if per_page == 0 {
            bail!("--per-page must be at least 1");
        }
        if !PER_PAGE_OPTIONS.contains(&per_page) {
            warnings.push(format!(
                "{} is not one of the usual page sizes {:?}",
                per_page, PER_PAGE_OPTIONS
            ));
        }
        config.per_page = per_page;
    }
    if let Some(delay) = changes.login_delay_ms {
        config.login_delay_ms = delay;
    }
    Ok(warnings)
}

fn print_config(config: &Config, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "mode": config.mode,
                "apiBaseUrl": config.api_base_url(),
                "perPage": config.per_page,
                "loginDelayMs": config.login_delay_ms,
            }))?
        );
        return Ok(());
    }

    let api_note = if config.api_base_url.is_some() {
        "custom"
    } else {
        "mode default"
    };
    println!("{}", "Settings".bold());
    println!("  Mode:        {}", config.mode);
    println!("  API:         {} {}", config.api_base_url(), format!("({})", api_note).dimmed());
    println!("  Per page:    {}", config.per_page);
    println!("  Login delay: {} ms", config.login_delay_ms);
    Ok(())
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let dir = get_lendsqr_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&dir)?;
            print_config(&config, json)?;
            if !json {
                println!("  File:        {}", dir.join(SETTINGS_FILE).display());
            }
        }
        ConfigCommands::Set {
            mode,
            api_url,
            reset_api_url,
            per_page,
            login_delay_ms,
        } => {
            let changes = ConfigChanges {
                mode,
                api_url,
                reset_api_url,
                per_page,
                login_delay_ms,
            };
            let mut config = Config::load_file(&dir)?;
            let before = config.clone();
            for warning in apply_changes(&mut config, changes)? {
                output::warning(&warning);
            }

            if config == before {
                output::info("Nothing to change.");
                return Ok(());
            }

            config.save(&dir)?;
            log_event(&get_logger(), LogEvent::new("config_saved").with_command("config set"));
            output::success(&format!("Saved {}", dir.join(SETTINGS_FILE).display()));
            print_config(&config, false)?;

            let env_override = ["LENDSQR_MODE", "LENDSQR_API_URL"]
                .into_iter()
                .any(|key| std::env::var(key).map(|v| !v.trim().is_empty()).unwrap_or(false));
            if env_override {
                output::warning("LENDSQR_MODE or LENDSQR_API_URL is set and takes precedence");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendsqr_core::config::PRODUCTION_API_URL;

    #[test]
    fn test_apply_mode_and_reset_url() {
        let mut config = Config {
            api_base_url: Some("http://127.0.0.1:4000".to_string()),
            ..Config::default()
        };
        let warnings = apply_changes(
            &mut config,
            ConfigChanges {
                mode: Some("prod".to_string()),
                reset_api_url: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.api_base_url(), PRODUCTION_API_URL);
    }

    #[test]
    fn test_api_url_normalized_and_validated() {
        let mut config = Config::default();
        apply_changes(
            &mut config,
            ConfigChanges {
                api_url: Some(" http://localhost:4000/ ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:4000");

        let bad = ConfigChanges {
            api_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(apply_changes(&mut config, bad).is_err());
    }

    #[test]
    fn test_per_page_rules() {
        let mut config = Config::default();
        let zero = ConfigChanges {
            per_page: Some(0),
            ..Default::default()
        };
        assert!(apply_changes(&mut config, zero).is_err());

        let odd = ConfigChanges {
            per_page: Some(15),
            ..Default::default()
        };
        let warnings = apply_changes(&mut config, odd).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.per_page, 15);
    }
}
