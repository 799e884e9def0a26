//! User command - full detail card for one customer
//!
//! An unknown id or a failed lookup falls back to the users list.

use anyhow::Result;
use colored::Colorize;
use lendsqr_core::services::{LogEvent, LoggingService};
use lendsqr_core::{Error, LendsqrContext, User};

use super::{fetch_users, get_context, get_logger, log_event, require_auth};
use crate::commands::users::render_table;
use crate::output;

pub fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    require_auth(&ctx, &logger, "user")?;

    let lookup = ctx.user_service.get_user_by_id(id);
    let user = match lookup {
        Ok(Some(user)) => user,
        Ok(None) => {
            let err = Error::not_found(format!("user {}", id));
            log_event(
                &logger,
                LogEvent::new("user_not_found")
                    .with_command("user")
                    .with_user_id(id)
                    .with_error(err.to_string()),
            );
            output::warning(&err.to_string());
            return back_to_list(&ctx, &logger, json);
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("user_fetch_failed")
                    .with_command("user")
                    .with_user_id(id)
                    .with_error(e.to_string()),
            );
            output::warning(&format!("Could not load user {}: {}", id, e));
            return back_to_list(&ctx, &logger, json);
        }
    };

    log_event(&logger, LogEvent::new("user_viewed").with_command("user").with_user_id(id));

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        render_user(&user);
    }
    Ok(())
}

fn back_to_list(
    ctx: &LendsqrContext,
    logger: &Option<LoggingService>,
    json: bool,
) -> Result<()> {
    let fetch = fetch_users(ctx, logger, "user", json)?;
    let table = ctx.user_table(fetch.users)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&table.page_items())?);
    } else {
        render_table(&table);
    }
    Ok(())
}

fn section(title: &str, fields: &[(&str, &str)]) {
    println!("{}", title.bold());
    let mut table = output::create_table();
    for chunk in fields.chunks(3) {
        let mut row = Vec::new();
        for (label, value) in chunk {
            row.push(format!("{}\n{}", label.to_uppercase().dimmed(), value));
        }
        table.add_row(row);
    }
    println!("{}", table);
    println!();
}

fn render_user(user: &User) {
    let (filled, total) = user.tier();
    println!("{}", user.full_name.bold());
    println!("{}", user.display_id().dimmed());
    println!(
        "User's Tier {}    {}    {}",
        output::stars(filled, total).yellow(),
        user.bank.balance.bold(),
        format!("{}/{}", user.bank.account_number, user.bank.bank_name).dimmed()
    );
    println!("Status: {}    Organization: {}", user.status, user.organization);
    println!();

    section(
        "Personal Information",
        &[
            ("Full Name", user.full_name.as_str()),
            ("Phone Number", user.phone_number.as_str()),
            ("Email Address", user.email.as_str()),
            ("BVN", user.bvn.as_str()),
            ("Gender", user.gender.as_str()),
            ("Marital Status", user.marital_status.as_str()),
            ("Children", user.children.as_str()),
            ("Type of Residence", user.type_of_residence.as_str()),
        ],
    );
    section(
        "Education and Employment",
        &[
            ("Level of Education", user.level_of_education.as_str()),
            ("Employment Status", user.employment_status.as_str()),
            ("Sector of Employment", user.sector_of_employment.as_str()),
            ("Duration of Employment", user.duration_of_employment.as_str()),
            ("Office Email", user.office_email.as_str()),
            ("Monthly Income", user.monthly_income.as_str()),
            ("Loan Repayment", user.loan_repayment.as_str()),
        ],
    );
    section(
        "Socials",
        &[
            ("Twitter", user.twitter.as_str()),
            ("Facebook", user.facebook.as_str()),
            ("Instagram", user.instagram.as_str()),
        ],
    );

    let guarantor = &user.guarantor;
    section(
        "Guarantor",
        &[
            ("Full Name", guarantor.full_name.as_str()),
            ("Phone Number", guarantor.phone_number.as_str()),
            ("Email Address", guarantor.email.as_str()),
            ("Relationship", guarantor.relationship.as_str()),
        ],
    );
    if let Some(second) = user.additional_guarantor.as_guarantor() {
        section(
            "Guarantor",
            &[
                ("Full Name", second.full_name.as_str()),
                ("Phone Number", second.phone_number.as_str()),
                ("Email Address", second.email.as_str()),
                ("Relationship", second.relationship.as_str()),
            ],
        );
    }
}
