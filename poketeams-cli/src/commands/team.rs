//! Team commands - create teams and manage their members

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;
use poketeams_core::services::{LoggingService, TeamStore};
use poketeams_core::{MutationOutcome, Team, TeamId, MAX_TEAM_SIZE};

#[derive(Subcommand)]
pub enum TeamCommands {
    /// Create a new, empty team
    New {
        /// Team name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List your teams
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the members of a team
    Show {
        /// Team id or name
        team: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a Pokémon to a team
    Add {
        /// Team id or name
        team: String,
        /// Pokédex number or name
        pokemon: String,
    },
    /// Remove a Pokémon from a team (every copy of it)
    Remove {
        /// Team id or name
        team: String,
        /// Pokédex number or name of a member
        pokemon: String,
    },
    /// Move a member to another position
    Move {
        /// Team id or name
        team: String,
        /// Current position (1-based)
        from: usize,
        /// New position (1-based)
        to: usize,
    },
}

impl TeamCommands {
    pub fn name(&self) -> &'static str {
        match self {
            TeamCommands::New { .. } => "team new",
            TeamCommands::List { .. } => "team list",
            TeamCommands::Show { .. } => "team show",
            TeamCommands::Add { .. } => "team add",
            TeamCommands::Remove { .. } => "team remove",
            TeamCommands::Move { .. } => "team move",
        }
    }
}

pub fn run(logger: &Option<Arc<LoggingService>>, command: TeamCommands) -> Result<()> {
    let mut ctx = get_context(logger)?;

    match command {
        TeamCommands::New { name, json } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Team name cannot be empty");
            }
            let store = ctx.session.require_store()?;
            let id = store.create_team(name);
            warn_if_unsaved(store);

            if json {
                println!("{}", serde_json::json!({ "id": id, "name": name }));
            } else {
                output::success(&format!("Created team '{}' (id {})", name, id));
            }
        }
        TeamCommands::List { json } => {
            let store = ctx.session.require_store()?;
            if json {
                println!("{}", serde_json::to_string_pretty(store.teams())?);
                return Ok(());
            }
            if store.teams().is_empty() {
                println!("No teams yet. Create one with 'pt team new <name>'.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Members", "Pokémon"]);
            for team in store.teams() {
                let members = team
                    .pokemon
                    .iter()
                    .map(|p| output::display_name(p.name().unwrap_or("?")))
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![
                    team.id.to_string(),
                    team.name.clone(),
                    format!("{}/{}", team.len(), MAX_TEAM_SIZE),
                    members,
                ]);
            }
            println!("{}", table);
        }
        TeamCommands::Show { team, json } => {
            let store = ctx.session.require_store()?;
            let team = find_team(store, &team)?;
            if json {
                println!("{}", serde_json::to_string_pretty(team)?);
                return Ok(());
            }
            print_team(team);
        }
        TeamCommands::Add { team, pokemon } => {
            let team_id = find_team(ctx.session.require_store()?, &team)?.id;
            let snapshot = ctx.catalog.lookup(&pokemon)?;
            let label = output::pokemon_label(&snapshot);

            let store = ctx.session.require_store()?;
            let outcome = store.add_member(team_id, snapshot);
            finish(store, outcome, &format!("Added {}", label))?;
        }
        TeamCommands::Remove { team, pokemon } => {
            let store = ctx.session.require_store()?;
            let team = find_team(store, &team)?;
            let (team_id, pokemon_id) = (team.id, find_member_id(team, &pokemon)?);

            let outcome = store.remove_member(team_id, pokemon_id);
            finish(store, outcome, &format!("Removed #{:03}", pokemon_id))?;
        }
        TeamCommands::Move { team, from, to } => {
            if from == 0 || to == 0 {
                bail!("Positions start at 1");
            }
            let store = ctx.session.require_store()?;
            let team_id = find_team(store, &team)?.id;

            let outcome = store.reorder(team_id, from - 1, to - 1);
            finish(store, outcome, &format!("Moved position {} to {}", from, to))?;
            if let Some(team) = store.team(team_id) {
                print_team(team);
            }
        }
    }

    Ok(())
}

/// Resolve a team by id, or by exact (case-insensitive) name when unambiguous
fn find_team<'a>(store: &'a TeamStore, selector: &str) -> Result<&'a Team> {
    let selector = selector.trim();
    if let Ok(id) = selector.parse::<TeamId>() {
        if let Some(team) = store.team(id) {
            return Ok(team);
        }
    }

    let matches: Vec<&Team> = store
        .teams()
        .iter()
        .filter(|t| t.name.eq_ignore_ascii_case(selector))
        .collect();
    match matches.as_slice() {
        [team] => Ok(team),
        [] => Err(anyhow!("No team matches '{}'", selector)),
        _ => Err(anyhow!(
            "Several teams are named '{}'; use the team id instead",
            selector
        )),
    }
}

/// Pokémon id of a team member given by number or name
fn find_member_id(team: &Team, selector: &str) -> Result<i64> {
    let selector = selector.trim();
    if let Ok(id) = selector.parse::<i64>() {
        return Ok(id);
    }
    team.pokemon
        .iter()
        .find(|p| p.name().is_some_and(|n| n.eq_ignore_ascii_case(selector)))
        .and_then(|p| p.id())
        .ok_or_else(|| anyhow!("'{}' is not on team '{}'", selector, team.name))
}

fn finish(store: &TeamStore, outcome: MutationOutcome, applied_msg: &str) -> Result<()> {
    warn_if_unsaved(store);
    match outcome {
        MutationOutcome::Applied => {
            output::success(applied_msg);
            Ok(())
        }
        MutationOutcome::Rejected(reason) => Err(anyhow!(reason)),
    }
}

fn warn_if_unsaved(store: &TeamStore) {
    if let Some(err) = store.last_persist_error() {
        output::warning(&format!("Warning: changes were not saved: {}", err));
    }
}

fn print_team(team: &Team) {
    println!(
        "{} {}",
        team.name.bold(),
        format!("({}/{} · id {})", team.len(), MAX_TEAM_SIZE, team.id).dimmed()
    );
    if team.is_empty() {
        println!("{}", "  No Pokémon yet".dimmed());
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["#", "Pokémon", "Types"]);
    for (position, pokemon) in team.pokemon.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            output::pokemon_label(pokemon),
            output::format_types(pokemon),
        ]);
    }
    println!("{}", table);
}
