//! Users command - filtered, paginated user list

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use lendsqr_core::services::{LogEvent, PageLink, UserTable, PER_PAGE_OPTIONS};
use lendsqr_core::{FilterField, User, UserFilters, UserStatus};

use super::{fetch_users, get_context, get_logger, log_event, require_auth};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Per-column filters; all given filters must match
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Organization contains (case-insensitive)
    #[arg(long)]
    pub organization: Option<String>,
    /// Username contains (case-insensitive)
    #[arg(long)]
    pub username: Option<String>,
    /// Email contains (case-insensitive)
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number contains
    #[arg(long)]
    pub phone: Option<String>,
    /// Exact status: active, inactive, pending, blacklisted
    #[arg(long)]
    pub status: Option<String>,
    /// Join date prefix, e.g. 2021-03-14
    #[arg(long)]
    pub date: Option<String>,
}

impl FilterArgs {
    pub fn into_filters(self) -> Result<UserFilters> {
        let status = match self.status {
            Some(raw) => {
                raw.parse::<UserStatus>()?;
                Some(raw.trim().to_string())
            }
            None => None,
        };
        let mut filters = UserFilters::default();
        let pairs = [
            (FilterField::Organization, self.organization),
            (FilterField::Username, self.username),
            (FilterField::Email, self.email),
            (FilterField::PhoneNumber, self.phone),
            (FilterField::Status, status),
            (FilterField::Date, self.date),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                filters.set(field, value);
            }
        }
        Ok(filters)
    }
}

pub fn run(
    filters: FilterArgs,
    page: usize,
    per_page: Option<usize>,
    all: bool,
    format: OutputFormat,
) -> Result<()> {
    if all && format == OutputFormat::Table {
        bail!("--all is only supported with --format json or csv");
    }
    let ctx = get_context()?;
    let logger = get_logger();
    require_auth(&ctx, &logger, "users")?;

    let filters = filters.into_filters()?;
    let fetch = fetch_users(&ctx, &logger, "users", format != OutputFormat::Table)?;

    let mut table = ctx.user_table(fetch.users)?;
    table.set_filters(filters);
    if let Some(size) = per_page {
        if !PER_PAGE_OPTIONS.contains(&size) {
            output::warning(&format!(
                "Unusual page size {} (pager offers {:?})",
                size, PER_PAGE_OPTIONS
            ));
        }
        table.set_per_page(size)?;
    }
    table.set_page(page);
    if page > table.current_page() && table.total_pages() > 0 {
        output::warning(&format!(
            "Page {} is past the end; showing page {}",
            page,
            table.current_page()
        ));
    }

    log_event(&logger, LogEvent::new("users_listed").with_command("users"));

    let rows: Vec<&User> = if all { table.filtered() } else { table.page_items() };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => write_csv(&rows)?,
        OutputFormat::Table => render_table(&table),
    }
    Ok(())
}

fn write_csv(rows: &[&User]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "id",
        "organization",
        "username",
        "email",
        "phoneNumber",
        "dateJoined",
        "status",
    ])?;
    for user in rows {
        writer.write_record([
            user.id.as_str(),
            user.organization.as_str(),
            user.username.as_str(),
            user.email.as_str(),
            user.phone_number.as_str(),
            user.date_joined.as_str(),
            user.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Current page as a table, followed by the pager line
pub fn render_table(table: &UserTable) {
    let items = table.page_items();
    if items.is_empty() {
        if table.filters().is_empty() {
            println!("No users found.");
        } else {
            println!("No users match the current filters.");
        }
        return;
    }

    let mut out = output::create_table();
    out.set_header(vec![
        "ID",
        "Organization",
        "Username",
        "Email",
        "Phone Number",
        "Date Joined",
        "Status",
    ]);
    for user in items {
        out.add_row(vec![
            comfy_table::Cell::new(&user.id),
            comfy_table::Cell::new(&user.organization),
            comfy_table::Cell::new(&user.username),
            comfy_table::Cell::new(&user.email),
            comfy_table::Cell::new(&user.phone_number),
            comfy_table::Cell::new(output::format_date(&user.date_joined)),
            output::status_cell(user.status),
        ]);
    }
    println!("{}", out);

    let showing = table.showing();
    let links: Vec<String> = table
        .page_links()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == table.current_page() => n.to_string().bold().to_string(),
            PageLink::Page(n) => n.to_string().dimmed().to_string(),
            PageLink::Ellipsis => "...".dimmed().to_string(),
        })
        .collect();
    println!(
        "Showing {}-{} out of {}    {}",
        showing.from,
        showing.to,
        showing.total,
        links.join(" ")
    );

    let active = table.filters().active();
    if !active.is_empty() {
        let summary: Vec<String> = active
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        println!("{}", format!("Filters: {}", summary.join(", ")).dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_map_to_fields() {
        let args = FilterArgs {
            organization: Some("irorun".to_string()),
            phone: Some("0803".to_string()),
            status: Some("PENDING".to_string()),
            ..Default::default()
        };
        let filters = args.into_filters().unwrap();

        assert_eq!(filters.get(FilterField::Organization), "irorun");
        assert_eq!(filters.get(FilterField::PhoneNumber), "0803");
        assert_eq!(filters.get(FilterField::Status), "PENDING");
        assert_eq!(filters.get(FilterField::Email), "");
    }

    #[test]
    fn test_padded_status_is_stored_trimmed() {
        let args = FilterArgs {
            status: Some(" active ".to_string()),
            ..Default::default()
        };
        let filters = args.into_filters().unwrap();
        assert_eq!(filters.get(FilterField::Status), "active");

        let mut active = User::new("LSQ00000001", "ada");
        active.status = UserStatus::Active;
        let mut pending = User::new("LSQ00000002", "bola");
        pending.status = UserStatus::Pending;
        assert!(filters.matches(&active));
        assert!(!filters.matches(&pending));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let args = FilterArgs {
            status: Some("suspended".to_string()),
            ..Default::default()
        };
        assert!(args.into_filters().is_err());
    }
}
