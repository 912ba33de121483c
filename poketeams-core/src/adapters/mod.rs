//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the SlotStore port (and local accounts)
//! - In-memory map for the SlotStore port
//! - Local accounts + session file for IdentityProvider
//! - PokeAPI HTTP client for PokemonSource

pub mod duckdb;
pub mod local_identity;
pub mod memory;
pub mod pokeapi;

#[cfg(test)]
pub mod pokeapi_mock;
