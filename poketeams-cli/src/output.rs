//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use poketeams_core::PokemonSnapshot;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// `pikachu` -> `Pikachu`
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `quick-attack` -> `Quick Attack`
pub fn move_display_name(name: &str) -> String {
    name.split('-')
        .filter(|word| !word.is_empty())
        .map(display_name)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn pokemon_label(pokemon: &PokemonSnapshot) -> String {
    let name = display_name(pokemon.name().unwrap_or("unknown"));
    match pokemon.id() {
        Some(id) => format!("#{:03} {}", id, name),
        None => name,
    }
}

pub fn format_types(pokemon: &PokemonSnapshot) -> String {
    pokemon
        .type_names()
        .iter()
        .map(|t| display_name(t))
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Render a unix-ms timestamp in UTC
pub fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("pikachu"), "Pikachu");
        assert_eq!(display_name("mr-mime"), "Mr-mime");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_move_display_name() {
        assert_eq!(move_display_name("quick-attack"), "Quick Attack");
        assert_eq!(move_display_name("thunderbolt"), "Thunderbolt");
        assert_eq!(move_display_name("u-turn"), "U Turn");
    }

    #[test]
    fn test_pokemon_label_and_types() {
        let p = PokemonSnapshot::new(json!({
            "id": 1,
            "name": "bulbasaur",
            "types": [
                { "slot": 1, "type": { "name": "grass" } },
                { "slot": 2, "type": { "name": "poison" } }
            ]
        }));
        assert_eq!(pokemon_label(&p), "#001 Bulbasaur");
        assert_eq!(format_types(&p), "Grass / Poison");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
    }
}
