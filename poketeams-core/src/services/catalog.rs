//! Catalog service - browsing and looking up Pokémon

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::result::Error;
use crate::domain::{PokemonRef, PokemonSnapshot};
use crate::ports::{PokemonPage, PokemonSource};

/// Entries per index page
pub const PAGE_SIZE: usize = 20;

/// Moves per page of a Pokémon's move list
pub const MOVES_PAGE_SIZE: usize = 10;

/// One Pokémon in an evolution line, flattened depth-first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionStage {
    pub id: Option<i64>,
    pub name: String,
    /// 0 for the base form, 1 for its evolutions, ...
    pub depth: usize,
}

/// A page of the index with 1-based page numbering
#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub page: usize,
    pub total_pages: usize,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: Option<i64>,
    pub name: String,
}

/// One page of a Pokémon's moves, sorted by name
#[derive(Debug, PartialEq, Serialize)]
pub struct MovesPage {
    pub page: usize,
    pub total_pages: usize,
    pub moves: Vec<String>,
}

pub struct CatalogService {
    source: Arc<dyn PokemonSource>,
}

impl CatalogService {
    pub fn new(source: Arc<dyn PokemonSource>) -> Self {
        Self { source }
    }

    /// Fetch a snapshot from user input such as `"25"` or `"Pikachu"`
    pub fn lookup(&self, input: &str) -> Result<PokemonSnapshot> {
        let reference: PokemonRef = input.parse()?;
        self.source
            .get_pokemon(&reference)
            .with_context(|| format!("Failed to fetch Pokémon {}", reference))
    }

    /// Index page `page` (1-based, values below 1 treated as 1)
    pub fn browse(&self, page: usize) -> Result<CatalogPage> {
        let page = page.max(1);
        let offset = (page - 1)
            .checked_mul(PAGE_SIZE)
            .ok_or_else(|| Error::validation(format!("Page {} is out of range", page)))?;
        let raw: PokemonPage = self
            .source
            .list_pokemon(PAGE_SIZE, offset)
            .context("Failed to fetch Pokémon index")?;

        Ok(CatalogPage {
            page,
            total_pages: total_pages(raw.count),
            entries: raw
                .results
                .into_iter()
                .map(|e| CatalogEntry {
                    id: id_from_url(&e.url),
                    name: e.name,
                })
                .collect(),
        })
    }

    /// Evolution line of the given Pokémon's species
    ///
    /// Empty when the species has no chain link.
    pub fn evolution_line(&self, pokemon_id: i64) -> Result<Vec<EvolutionStage>> {
        let species = self
            .source
            .get_species(pokemon_id)
            .with_context(|| format!("Failed to fetch species #{}", pokemon_id))?;

        let Some(chain_id) = species
            .pointer("/evolution_chain/url")
            .and_then(JsonValue::as_str)
            .and_then(id_from_url)
        else {
            return Ok(Vec::new());
        };

        let chain = self
            .source
            .get_evolution_chain(chain_id)
            .with_context(|| format!("Failed to fetch evolution chain #{}", chain_id))?;

        let mut stages = Vec::new();
        if let Some(root) = chain.get("chain") {
            flatten_chain(root, 0, &mut stages);
        }
        Ok(stages)
    }
}

/// Page `page` of the snapshot's moves, alphabetically
///
/// Out-of-range pages are clamped to the first or last page.
pub fn moves_page(snapshot: &PokemonSnapshot, page: usize) -> MovesPage {
    let mut names = snapshot.move_names();
    names.sort_unstable();

    let total_pages = names.len().div_ceil(MOVES_PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let moves = names
        .into_iter()
        .skip((page - 1) * MOVES_PAGE_SIZE)
        .take(MOVES_PAGE_SIZE)
        .map(str::to_string)
        .collect();

    MovesPage {
        page,
        total_pages,
        moves,
    }
}

fn flatten_chain(link: &JsonValue, depth: usize, out: &mut Vec<EvolutionStage>) {
    let Some(name) = link.pointer("/species/name").and_then(JsonValue::as_str) else {
        return;
    };
    out.push(EvolutionStage {
        id: link
            .pointer("/species/url")
            .and_then(JsonValue::as_str)
            .and_then(id_from_url),
        name: name.to_string(),
        depth,
    });
    if let Some(next) = link.get("evolves_to").and_then(JsonValue::as_array) {
        for child in next {
            flatten_chain(child, depth + 1, out);
        }
    }
}

/// Trailing numeric segment of an API resource URL
///
/// `https://pokeapi.co/api/v2/pokemon/25/` -> `Some(25)`
pub fn id_from_url(url: &str) -> Option<i64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

pub fn total_pages(count: i64) -> usize {
    let count = count.max(0) as usize;
    count.div_ceil(PAGE_SIZE).max(1)
}
