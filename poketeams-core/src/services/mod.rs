//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod catalog;
pub mod logging;
pub mod migration;
mod session;
mod status;
mod team;

pub use catalog::{
    moves_page, CatalogEntry, CatalogPage, CatalogService, EvolutionStage, MovesPage,
    MOVES_PAGE_SIZE, PAGE_SIZE,
};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use session::SessionService;
pub use status::{StatusService, StatusSummary, TeamSummary};
pub use team::TeamStore;
