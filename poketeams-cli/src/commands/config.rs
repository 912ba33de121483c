//! Config command - show or change settings

use anyhow::{bail, Result};
use colored::Colorize;

use super::get_data_dir;
use crate::output;
use poketeams_core::adapters::pokeapi::POKEAPI_BASE_URL_ENV;
use poketeams_core::config::Config;

pub fn run(api_base_url: Option<String>, timeout_secs: Option<u64>, json: bool) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    let changed = apply_changes(&mut config, api_base_url, timeout_secs)?;
    if changed {
        config.save(&data_dir)?;
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "api_base_url": config.api_base_url,
                "request_timeout_secs": config.request_timeout_secs,
                "saved": changed,
            })
        );
        return Ok(());
    }

    if changed {
        output::success("Settings saved");
    }
    println!("{}", "Settings".bold());
    println!("  API base URL:    {}", config.api_base_url);
    println!("  Request timeout: {}s", config.request_timeout_secs);
    if std::env::var(POKEAPI_BASE_URL_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        output::warning(&format!(
            "{} is set and overrides the API base URL",
            POKEAPI_BASE_URL_ENV
        ));
    }
    Ok(())
}

/// Apply requested changes, returning whether anything was given
fn apply_changes(
    config: &mut Config,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<bool> {
    let mut changed = false;

    if let Some(url) = api_base_url {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("API base URL must start with http:// or https://");
        }
        config.api_base_url = url;
        changed = true;
    }

    if let Some(secs) = timeout_secs {
        if secs == 0 {
            bail!("Timeout must be at least 1 second");
        }
        config.request_timeout_secs = secs;
        changed = true;
    }

    Ok(changed)
}
