//! Core domain entities
//!
//! Pure data structures with their invariants - no I/O or external dependencies.

mod outcome;
mod pokemon;
pub mod result;
mod team;
mod user;

pub use outcome::{MutationOutcome, Rejection};
pub use pokemon::{PokemonRef, PokemonSnapshot};
pub use team::{Team, TeamId, MAX_TEAM_SIZE};
pub use user::{Credentials, User};
