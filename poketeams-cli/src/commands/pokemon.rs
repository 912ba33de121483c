//! Pokémon commands - browse the index and inspect a Pokémon

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;
use poketeams_core::services::{moves_page, LoggingService};

#[derive(Subcommand)]
pub enum PokemonCommands {
    /// Browse the Pokémon index, 20 per page
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show details for one Pokémon
    Show {
        /// Pokédex number or name
        pokemon: String,
        /// Also fetch the evolution line
        #[arg(long, short)]
        evolution: bool,
        /// Output the raw API document as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the moves a Pokémon can learn, 10 per page
    Moves {
        /// Pokédex number or name
        pokemon: String,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl PokemonCommands {
    pub fn name(&self) -> &'static str {
        match self {
            PokemonCommands::List { .. } => "pokemon list",
            PokemonCommands::Show { .. } => "pokemon show",
            PokemonCommands::Moves { .. } => "pokemon moves",
        }
    }
}

pub fn run(logger: &Option<Arc<LoggingService>>, command: PokemonCommands) -> Result<()> {
    let ctx = get_context(logger)?;

    match command {
        PokemonCommands::List { page, json } => {
            let page = ctx.catalog.browse(page)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["#", "Name"]);
            for entry in &page.entries {
                table.add_row(vec![
                    entry.id.map(|id| format!("{:03}", id)).unwrap_or_default(),
                    output::display_name(&entry.name),
                ]);
            }
            println!("{}", table);
            println!(
                "{}",
                format!("Page {} of {}", page.page, page.total_pages).dimmed()
            );
        }
        PokemonCommands::Show {
            pokemon,
            evolution,
            json,
        } => {
            let snapshot = ctx.catalog.lookup(&pokemon)?;
            let line = match (evolution, snapshot.id()) {
                (true, Some(id)) => ctx.catalog.evolution_line(id)?,
                _ => Vec::new(),
            };

            if json {
                let mut doc = serde_json::json!({ "pokemon": snapshot.as_json() });
                if evolution {
                    doc["evolution"] = serde_json::to_value(&line)?;
                }
                println!("{}", serde_json::to_string_pretty(&doc)?);
                return Ok(());
            }

            println!("{}", output::pokemon_label(&snapshot).bold());
            println!("  Types: {}", output::format_types(&snapshot));
            if let Some(url) = snapshot.artwork_url() {
                println!("  Artwork: {}", url.dimmed());
            }

            let stats = snapshot.base_stats();
            if !stats.is_empty() {
                let mut table = output::create_table();
                table.set_header(vec!["Stat", "Base"]);
                for (name, value) in stats {
                    table.add_row(vec![name.to_string(), value.to_string()]);
                }
                println!("{}", table);
            }

            if !line.is_empty() {
                println!("{}", "Evolution".bold());
                for stage in &line {
                    let indent = "  ".repeat(stage.depth);
                    println!("  {}{}", indent, output::display_name(&stage.name));
                }
            }

            // Teams that could still take this Pokémon
            if let Some(user) = ctx.session.current_user() {
                let open: Vec<&str> = ctx
                    .session
                    .store()
                    .teams()
                    .iter()
                    .filter(|t| !t.is_full())
                    .map(|t| t.name.as_str())
                    .collect();
                if !open.is_empty() {
                    let hint = format!("{} can add it to: {}", user.username, open.join(", "));
                    println!("{}", hint.dimmed());
                }
            }
        }
        PokemonCommands::Moves {
            pokemon,
            page,
            json,
        } => {
            let snapshot = ctx.catalog.lookup(&pokemon)?;
            let moves = moves_page(&snapshot, page);
            if json {
                println!("{}", serde_json::to_string_pretty(&moves)?);
                return Ok(());
            }

            println!("{}", output::pokemon_label(&snapshot).bold());
            if moves.moves.is_empty() {
                println!("No known moves.");
                return Ok(());
            }
            for name in &moves.moves {
                println!("  {}", output::move_display_name(name));
            }
            println!(
                "{}",
                format!("Page {} of {}", moves.page, moves.total_pages).dimmed()
            );
        }
    }

    Ok(())
}
