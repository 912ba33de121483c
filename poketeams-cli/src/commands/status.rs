//! Status command - summary of your teams

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;
use poketeams_core::services::LoggingService;

pub fn run(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let status = ctx.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let Some(username) = &status.username else {
        output::info("Not signed in. Run 'pt login' or 'pt register'.");
        return Ok(());
    };

    println!("{}", format!("Teams for {}", username).bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Teams", &status.total_teams.to_string()]);
    table.add_row(vec!["Pokémon", &status.total_members.to_string()]);
    table.add_row(vec!["Full teams", &status.full_teams.to_string()]);
    println!("{}", table);

    for team in &status.teams {
        let slots = format!("{}/{}", team.members, status.max_team_size);
        let slots = if team.open_slots == 0 {
            slots.green().to_string()
        } else {
            slots
        };
        println!("  • {} {}", team.name, slots);
    }

    if let Some(err) = &status.last_persist_error {
        output::warning(&format!("Last save failed: {}", err));
    }
    Ok(())
}
