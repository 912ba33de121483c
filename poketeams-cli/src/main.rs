//! PokeTeams CLI - build Pokémon teams in your terminal

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, config, log_event, log_failure, logs, pokemon, status, team};
use poketeams_core::services::{LogEvent, LoggingService};

/// PokeTeams - build Pokémon teams in your terminal
#[derive(Parser)]
#[command(name = "pt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Username (prompted if omitted)
        #[arg(long, short)]
        username: Option<String>,
        /// Password (prompted if omitted)
        #[arg(long, env = "PT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in and load your teams
    Login {
        /// Username (prompted if omitted)
        #[arg(long, short)]
        username: Option<String>,
        /// Password (prompted if omitted)
        #[arg(long, env = "PT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage your teams
    Team {
        #[command(subcommand)]
        command: team::TeamCommands,
    },

    /// Browse and inspect Pokémon
    Pokemon {
        #[command(subcommand)]
        command: pokemon::PokemonCommands,
    },

    /// Show a summary of your teams
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show settings, or change them with the flags below
    Config {
        /// PokeAPI base URL
        #[arg(long)]
        api_base_url: Option<String>,
        /// HTTP request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Team { command } => command.name(),
            Commands::Pokemon { command } => command.name(),
            Commands::Status { .. } => "status",
            Commands::Config { .. } => "config",
            Commands::Logs { command } => command.name(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command_name = cli.command.name();

    let logger = commands::get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command(command_name));

    match run(cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_failure(&logger, command_name, &e);
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, logger: &Option<Arc<LoggingService>>) -> Result<()> {
    match cli.command {
        Commands::Register {
            username,
            password,
            json,
        } => account::register(logger, username, password, json),
        Commands::Login {
            username,
            password,
            json,
        } => account::login(logger, username, password, json),
        Commands::Logout => account::logout(logger),
        Commands::Whoami { json } => account::whoami(logger, json),
        Commands::Team { command } => team::run(logger, command),
        Commands::Pokemon { command } => pokemon::run(logger, command),
        Commands::Status { json } => status::run(logger, json),
        Commands::Config {
            api_base_url,
            timeout_secs,
            json,
        } => config::run(api_base_url, timeout_secs, json),
        Commands::Logs { command } => logs::run(logger, command),
    }
}
