//! Team domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::outcome::Rejection;
use super::pokemon::PokemonSnapshot;

/// Maximum number of Pokémon in a team
pub const MAX_TEAM_SIZE: usize = 6;

/// Team identifier, unique within one user's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TeamId)
    }
}

/// A named, ordered roster of up to six Pokémon snapshots
///
/// Serialized as `{ "id": <int>, "name": <string>, "pokemon": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<PokemonSnapshot>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pokemon: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pokemon.len() >= MAX_TEAM_SIZE
    }

    pub fn open_slots(&self) -> usize {
        MAX_TEAM_SIZE.saturating_sub(self.pokemon.len())
    }

    /// Append a member unless the roster is full.
    ///
    /// Does not check for an existing member with the same Pokémon id.
    pub fn push_member(&mut self, snapshot: PokemonSnapshot) -> Result<(), Rejection> {
        if self.is_full() {
            return Err(Rejection::TeamFull { team_id: self.id });
        }
        self.pokemon.push(snapshot);
        Ok(())
    }

    /// Remove every member whose id equals `pokemon_id`, keeping the order
    /// of the survivors. Returns the number removed.
    pub fn remove_members(&mut self, pokemon_id: i64) -> usize {
        let before = self.pokemon.len();
        self.pokemon.retain(|p| p.id() != Some(pokemon_id));
        before - self.pokemon.len()
    }

    /// Move the member at `from` so it ends up at `to`. Not a swap: members
    /// between the two positions shift by one. A `to` past the end places the
    /// member last.
    pub fn move_member(&mut self, from: usize, to: usize) -> Result<(), Rejection> {
        if from >= self.pokemon.len() {
            return Err(Rejection::IndexOutOfRange {
                team_id: self.id,
                index: from,
                len: self.pokemon.len(),
            });
        }
        let member = self.pokemon.remove(from);
        let to = to.min(self.pokemon.len());
        self.pokemon.insert(to, member);
        Ok(())
    }
}
