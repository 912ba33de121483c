//! PokeTeams Core - per-user Pokémon team management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Team, PokemonSnapshot, User, MutationOutcome)
//! - **ports**: Trait definitions for external dependencies (SlotStore, IdentityProvider, PokemonSource)
//! - **services**: Business logic orchestration (TeamStore, SessionService, CatalogService, ...)
//! - **adapters**: Concrete implementations (DuckDB, in-memory, local accounts, PokeAPI)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbStore;
use adapters::local_identity::LocalIdentityProvider;
use adapters::pokeapi::PokeApiClient;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    Credentials, MutationOutcome, PokemonRef, PokemonSnapshot, Rejection, Team, TeamId, User,
    MAX_TEAM_SIZE,
};

/// Database file holding slots and accounts
pub const DB_FILENAME: &str = "poketeams.duckdb";

/// Main context for PokeTeams operations
///
/// This is the primary entry point for all business logic. It holds the
/// database, the signed-in session and the services built on top of them.
pub struct PokeTeamsContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<DuckDbStore>,
    pub identity: Arc<LocalIdentityProvider>,
    pub session: SessionService,
    pub catalog: CatalogService,
    pub status_service: StatusService,
}

impl PokeTeamsContext {
    /// Create a new context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Self::with_logger(data_dir, None)
    }

    /// Like `new`, with team events recorded through `logger`
    pub fn with_logger(data_dir: &Path, logger: Option<Arc<LoggingService>>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let store = Arc::new(
            DuckDbStore::new(&data_dir.join(DB_FILENAME)).context("Failed to open database")?,
        );
        store.ensure_schema()?;

        let identity = Arc::new(LocalIdentityProvider::new(Arc::clone(&store), data_dir));

        let mut team_store = TeamStore::new(store.clone());
        if let Some(logger) = logger {
            team_store = team_store.with_logger(logger);
        }
        let session = SessionService::new(identity.clone(), team_store)?;

        let client = PokeApiClient::with_timeout(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let catalog = CatalogService::new(Arc::new(client));

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            identity,
            session,
            catalog,
            status_service: StatusService::new(),
        })
    }

    /// Create an account, sign it in and bind the team store to it
    pub fn register(&mut self, credentials: &Credentials) -> Result<User> {
        let user = self
            .identity
            .register(credentials)
            .context("Registration failed")?;
        self.session.sync()?;
        Ok(user)
    }

    pub fn status(&self) -> StatusSummary {
        self.status_service.get_status(self.session.store())
    }
}
