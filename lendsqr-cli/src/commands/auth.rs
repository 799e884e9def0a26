//! Login, logout and whoami commands

use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use lendsqr_core::services::LogEvent;
use lendsqr_core::{Credentials, Error};

use super::{get_context, get_logger, log_event};
use crate::output;

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Use the flag value, else prompt when attached to a terminal
fn resolve_field(value: Option<String>, prompt: &str, secret: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if atty::isnt(atty::Stream::Stdin) {
        bail!("{} is required (pass it as a flag when not running interactively)", prompt);
    }
    let answer = if secret {
        Password::new().with_prompt(prompt).interact()?
    } else {
        Input::new().with_prompt(prompt).interact_text()?
    };
    Ok(answer)
}

/// Reject blank fields; the values themselves are passed through untouched
fn credentials_from_input(email: String, password: String) -> Result<Credentials> {
    if email.trim().is_empty() {
        bail!("Email is required");
    }
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(Credentials::new(email, password))
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    if let Some(current) = ctx
        .auth_service
        .get_current_user()
        .filter(|_| ctx.auth_service.is_authenticated())
    {
        if json {
            println!("{}", serde_json::to_string_pretty(&current)?);
        } else {
            output::info(&format!("Already logged in as {}", current.email));
        }
        return Ok(());
    }

    let email = resolve_field(email, "Email", false)?;
    let password = resolve_field(password, "Password", true)?;
    let credentials = credentials_from_input(email, password)?;
    let spinner = (!json).then(|| create_spinner("Logging in..."));
    let result = ctx.auth_service.login(&credentials);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(user) => {
            log_event(&logger, LogEvent::new("login_succeeded").with_command("login"));
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                output::success(&format!("Welcome, {}!", user.name));
            }
            Ok(())
        }
        Err(Error::InvalidCredentials) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
                    .with_error(Error::InvalidCredentials.to_string()),
            );
            bail!("{}", Error::InvalidCredentials)
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}

pub fn run_logout() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let was_logged_in = ctx.auth_service.is_authenticated();
    ctx.auth_service.logout();
    log_event(&logger, LogEvent::new("logout").with_command("logout"));

    if was_logged_in {
        output::success("Logged out.");
    } else {
        output::info("Not logged in.");
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx
        .auth_service
        .get_current_user()
        .filter(|_| ctx.auth_service.is_authenticated());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "authenticated": user.is_some(),
                "user": user,
            })
        );
        return Ok(());
    }

    match user {
        Some(user) => {
            println!("{} {}", user.name.bold(), format!("<{}>", user.email).dimmed());
            println!("API: {}", ctx.user_service.api_base_url());
        }
        None => output::info("Not logged in."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendsqr_core::adapters::clock::SystemClock;
    use lendsqr_core::adapters::memory::MemoryStore;
    use lendsqr_core::services::{AuthService, SessionStore};
    use std::sync::Arc;

    #[test]
    fn test_blank_fields_required() {
        assert!(credentials_from_input("   ".to_string(), "password".to_string()).is_err());
        assert!(credentials_from_input("test@lendsqr.com".to_string(), String::new()).is_err());
    }

    #[test]
    fn test_padded_email_is_not_accepted() {
        let session = Arc::new(SessionStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
        ));
        let auth = AuthService::new(session).with_login_delay(Duration::ZERO);

        let creds =
            credentials_from_input(" test@lendsqr.com ".to_string(), "password".to_string())
                .unwrap();
        assert!(matches!(auth.login(&creds), Err(Error::InvalidCredentials)));
        assert!(!auth.is_authenticated());
    }
}
