//! Pokémon snapshot domain model
//!
//! A snapshot is the JSON document returned by the data API for one Pokémon,
//! captured at the moment it is added to a team. It is stored verbatim: no
//! fields are added or stripped. Only `id` carries meaning for team logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Opaque Pokémon record as fetched from the data API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonSnapshot(JsonValue);

impl PokemonSnapshot {
    pub fn new(raw: JsonValue) -> Self {
        Self(raw)
    }

    /// Pokémon id used for identity within a team (None if absent or not an integer)
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(JsonValue::as_i64)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(JsonValue::as_str)
    }

    /// Type names in slot order, e.g. `["grass", "poison"]`
    pub fn type_names(&self) -> Vec<&str> {
        self.0
            .get("types")
            .and_then(JsonValue::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(|t| t.pointer("/type/name").and_then(JsonValue::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Base stat values keyed by stat name, in API order
    pub fn base_stats(&self) -> Vec<(&str, i64)> {
        self.0
            .get("stats")
            .and_then(JsonValue::as_array)
            .map(|stats| {
                stats
                    .iter()
                    .filter_map(|s| {
                        let name = s.pointer("/stat/name").and_then(JsonValue::as_str)?;
                        let value = s.get("base_stat").and_then(JsonValue::as_i64)?;
                        Some((name, value))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Official artwork URL, falling back to the default front sprite
    pub fn artwork_url(&self) -> Option<&str> {
        self.0
            .pointer("/sprites/other/official-artwork/front_default")
            .and_then(JsonValue::as_str)
            .or_else(|| {
                self.0
                    .pointer("/sprites/front_default")
                    .and_then(JsonValue::as_str)
            })
    }

    /// Names of every move the Pokémon can learn, in API order
    pub fn move_names(&self) -> Vec<&str> {
        self.0
            .get("moves")
            .and_then(JsonValue::as_array)
            .map(|moves| {
                moves
                    .iter()
                    .filter_map(|m| m.pointer("/move/name").and_then(JsonValue::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

/// Reference to a Pokémon in the data API: numeric id or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokemonRef {
    Id(i64),
    Name(String),
}

impl PokemonRef {
    /// URL path segment for this reference. Names are lower-cased because
    /// the API only resolves lower-case names.
    pub fn path_segment(&self) -> String {
        match self {
            PokemonRef::Id(id) => id.to_string(),
            PokemonRef::Name(name) => name.to_lowercase(),
        }
    }
}

impl FromStr for PokemonRef {
    type Err = crate::domain::result::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::domain::result::Error::validation(
                "Pokémon name or id cannot be empty",
            ));
        }
        match trimmed.parse::<i64>() {
            Ok(id) if id > 0 => Ok(PokemonRef::Id(id)),
            Ok(_) => Err(crate::domain::result::Error::validation(format!(
                "Invalid Pokémon id: {}",
                trimmed
            ))),
            Err(_) => {
                let name = trimmed.to_lowercase();
                // Names end up in a URL path
                if !name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                {
                    return Err(crate::domain::result::Error::validation(format!(
                        "Invalid Pokémon name: {}",
                        trimmed
                    )));
                }
                Ok(PokemonRef::Name(name))
            }
        }
    }
}

impl fmt::Display for PokemonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokemonRef::Id(id) => write!(f, "#{}", id),
            PokemonRef::Name(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulbasaur() -> PokemonSnapshot {
        PokemonSnapshot::new(json!({
            "id": 1,
            "name": "bulbasaur",
            "types": [
                { "slot": 1, "type": { "name": "grass" } },
                { "slot": 2, "type": { "name": "poison" } }
            ],
            "stats": [
                { "base_stat": 45, "stat": { "name": "hp" } },
                { "base_stat": 49, "stat": { "name": "attack" } }
            ],
            "sprites": {
                "front_default": "front.png",
                "other": { "official-artwork": { "front_default": "art.png" } }
            },
            "moves": [
                { "move": { "name": "vine-whip" } },
                { "move": { "name": "cut" } }
            ],
            "base_experience": 64
        }))
    }

    #[test]
    fn test_snapshot_accessors() {
        let p = bulbasaur();
        assert_eq!(p.id(), Some(1));
        assert_eq!(p.name(), Some("bulbasaur"));
        assert_eq!(p.type_names(), vec!["grass", "poison"]);
        assert_eq!(p.base_stats(), vec![("hp", 45), ("attack", 49)]);
        assert_eq!(p.artwork_url(), Some("art.png"));
        assert_eq!(p.move_names(), vec!["vine-whip", "cut"]);
    }

    #[test]
    fn test_snapshot_serializes_verbatim() {
        let p = bulbasaur();
        let serialized = serde_json::to_value(&p).unwrap();
        assert_eq!(&serialized, p.as_json());
        assert_eq!(serialized["base_experience"], 64);
    }

    #[test]
    fn test_snapshot_without_id() {
        let p = PokemonSnapshot::new(json!({ "name": "missingno" }));
        assert_eq!(p.id(), None);
        assert!(p.type_names().is_empty());
        assert!(p.move_names().is_empty());
        assert_eq!(p.artwork_url(), None);
    }

    #[test]
    fn test_parse_ref() {
        assert_eq!("25".parse::<PokemonRef>().unwrap(), PokemonRef::Id(25));
        assert_eq!(
            " Pikachu ".parse::<PokemonRef>().unwrap(),
            PokemonRef::Name("pikachu".to_string())
        );
        assert_eq!(
            "Mr-Mime".parse::<PokemonRef>().unwrap(),
            PokemonRef::Name("mr-mime".to_string())
        );
        assert!("".parse::<PokemonRef>().is_err());
        assert!("0".parse::<PokemonRef>().is_err());
        assert!("-3".parse::<PokemonRef>().is_err());
    }

    #[test]
    fn test_parse_ref_rejects_url_syntax() {
        for input in ["../pokemon-species/1", "pikachu?x=1", "pika chu", "mew#2", "%2e%2e"] {
            assert!(
                matches!(
                    input.parse::<PokemonRef>(),
                    Err(crate::domain::result::Error::Validation(_))
                ),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_path_segment_lowercases_names() {
        assert_eq!(PokemonRef::Name("Mr-Mime".into()).path_segment(), "mr-mime");
        assert_eq!(PokemonRef::Id(151).path_segment(), "151");
    }
}
