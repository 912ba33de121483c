//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod identity;
mod pokemon_source;
mod slot_store;

pub use identity::IdentityProvider;
pub use pokemon_source::{PokemonPage, PokemonPageEntry, PokemonSource};
pub use slot_store::SlotStore;
