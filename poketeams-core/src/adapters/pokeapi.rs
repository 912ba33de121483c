//! PokeAPI client
//!
//! Handles communication with the public Pokémon data API.
//!
//! API Documentation: https://pokeapi.co/docs/v2

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::{PokemonRef, PokemonSnapshot};
use crate::ports::{PokemonPage, PokemonPageEntry, PokemonSource};

/// Default production API URL
pub const POKEAPI_PRODUCTION_URL: &str = "https://pokeapi.co/api/v2";

/// Environment variable to override the PokeAPI base URL.
pub const POKEAPI_BASE_URL_ENV: &str = "POKEAPI_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Index page as returned by `GET /pokemon?limit=&offset=`
#[derive(Debug, Deserialize)]
struct IndexResponse {
    count: i64,
    next: Option<String>,
    results: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    name: String,
    url: String,
}

/// PokeAPI client
#[derive(Debug)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::Config("PokeAPI base URL cannot be empty".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("poketeams/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        let response = self.check_response_status(response, what)?;
        response
            .json()
            .map_err(|e| Error::api(format!("Failed to parse {} response: {}", what, e)))
    }

    fn check_response_status(&self, response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::NOT_FOUND => Err(Error::not_found(what.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(Error::api("Rate limited by PokeAPI, try again shortly"))
            }
            _ => Err(Error::api(format!(
                "PokeAPI returned {} for {}",
                status.as_u16(),
                what
            ))),
        }
    }

    fn map_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::api("Request to PokeAPI timed out")
        } else if e.is_connect() {
            Error::api(format!("Could not connect to {}", self.base_url))
        } else {
            Error::api(format!("Request failed: {}", e))
        }
    }
}

impl PokemonSource for PokeApiClient {
    fn get_pokemon(&self, reference: &PokemonRef) -> Result<PokemonSnapshot> {
        let raw: JsonValue = self.get_json(
            &format!("pokemon/{}", reference.path_segment()),
            &format!("Pokémon {}", reference),
        )?;
        Ok(PokemonSnapshot::new(raw))
    }

    fn get_species(&self, id: i64) -> Result<JsonValue> {
        self.get_json(
            &format!("pokemon-species/{}", id),
            &format!("species #{}", id),
        )
    }

    fn get_evolution_chain(&self, id: i64) -> Result<JsonValue> {
        self.get_json(
            &format!("evolution-chain/{}", id),
            &format!("evolution chain #{}", id),
        )
    }

    fn list_pokemon(&self, limit: usize, offset: usize) -> Result<PokemonPage> {
        let index: IndexResponse = self.get_json(
            &format!("pokemon?limit={}&offset={}", limit, offset),
            "Pokémon index",
        )?;
        Ok(PokemonPage {
            count: index.count,
            offset,
            has_next: index.next.is_some(),
            results: index
                .results
                .into_iter()
                .map(|e| PokemonPageEntry {
                    name: e.name,
                    url: e.url,
                })
                .collect(),
        })
    }
}
