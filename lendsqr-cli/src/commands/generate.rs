//! Generate command - write a mock users dataset (`db.json`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use lendsqr_core::adapters::generator::{generate_users, write_dataset};
use lendsqr_core::services::LogEvent;

use super::{get_logger, log_event};
use crate::output;

/// Seed from the clock when none is given
pub fn seed_or_now(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis().unsigned_abs())
}

pub fn run(count: usize, seed: Option<u64>, output_path: PathBuf, json: bool) -> Result<()> {
    let logger = get_logger();
    let seed = seed_or_now(seed);

    let users = generate_users(count, seed);
    write_dataset(&output_path, users)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    log_event(&logger, LogEvent::new("dataset_generated").with_command("generate"));

    if json {
        println!(
            "{}",
            serde_json::json!({
                "count": count,
                "seed": seed,
                "path": output_path.to_string_lossy(),
            })
        );
    } else {
        output::success(&format!(
            "Generated {} users to {} (seed {})",
            count,
            output_path.display(),
            seed
        ));
    }
    Ok(())
}
