use std::path::Path;

use clap::Subcommand;
use serde_json::json;

use crate::output;
use crate::settings::Settings;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the endpoints file
    Validate,
}

pub fn run(config_path: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Validate => validate(config_path, json),
    }
}

fn validate(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load(config_path)?;
    settings.validate()?;

    if json {
        output::print_json(&json!({
            "status": "ok",
            "services": settings.services.len(),
            "budget_secs": settings.budget_secs,
            "backoff_secs": settings.backoff_secs,
        }))?;
    } else {
        println!(
            "ok: {} services, {}s budget, {}s backoff",
            settings.services.len(),
            settings.budget_secs,
            settings.backoff_secs
        );
    }
    Ok(())
}
