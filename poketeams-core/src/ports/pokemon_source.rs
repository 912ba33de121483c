//! Pokémon data source port
//!
//! Defines the interface for fetching Pokémon documents from the public
//! data API. Documents are returned as-is; callers decide what to keep.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::{PokemonRef, PokemonSnapshot};

/// One entry of the paginated Pokémon index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonPageEntry {
    pub name: String,
    pub url: String,
}

/// A page of the Pokémon index
#[derive(Debug, Clone, Serialize)]
pub struct PokemonPage {
    /// Total number of Pokémon known to the API
    pub count: i64,
    pub offset: usize,
    pub results: Vec<PokemonPageEntry>,
    /// Whether another page follows this one
    pub has_next: bool,
}

/// Pokémon data source trait
pub trait PokemonSource: Send + Sync {
    /// Fetch the full document for one Pokémon
    fn get_pokemon(&self, reference: &PokemonRef) -> Result<PokemonSnapshot>;

    /// Fetch the species document (flavor text, evolution chain link, ...)
    fn get_species(&self, id: i64) -> Result<JsonValue>;

    /// Fetch an evolution chain document by chain id
    fn get_evolution_chain(&self, id: i64) -> Result<JsonValue>;

    /// Fetch one page of the Pokémon index
    fn list_pokemon(&self, limit: usize, offset: usize) -> Result<PokemonPage>;
}
