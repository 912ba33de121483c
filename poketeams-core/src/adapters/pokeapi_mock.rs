//! Mock PokeAPI server for testing
//!
//! Serves a tiny fixed dataset over real HTTP so the client is exercised end
//! to end without network access:
//! - GET /pokemon/{id|name} returns the Pokémon document or 404
//! - GET /pokemon-species/{id} returns the species document (500 for id 500)
//! - GET /evolution-chain/1 returns the bulbasaur line
//! - GET /pokemon?limit=N&offset=M returns { count, next, previous, results }

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value as JsonValue};

/// Mock PokeAPI server bound to a random local port
pub struct MockPokeApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockPokeApiServer {
    /// Start a new mock server on a random available port
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("local addr").port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        // Non-blocking accept so the loop can notice shutdown
        listener.set_nonblocking(true).expect("set non-blocking");

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        thread::spawn(move || handle_connection(stream));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockPokeApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn dataset() -> Vec<JsonValue> {
    vec![
        pokemon(1, "bulbasaur", &["grass", "poison"]),
        pokemon(4, "charmander", &["fire"]),
        pokemon(25, "pikachu", &["electric"]),
    ]
}

fn pokemon(id: i64, name: &str, types: &[&str]) -> JsonValue {
    json!({
        "id": id,
        "name": name,
        "types": types
            .iter()
            .enumerate()
            .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t } }))
            .collect::<Vec<_>>(),
        "stats": [
            { "base_stat": 45, "stat": { "name": "hp" } },
            { "base_stat": 49, "stat": { "name": "attack" } }
        ],
        "sprites": {
            "front_default": format!("https://img.example/{}.png", id),
            "other": { "official-artwork": { "front_default": format!("https://art.example/{}.png", id) } }
        }
    })
}

fn chain_link(id: i64, name: &str, evolves_to: Vec<JsonValue>) -> JsonValue {
    json!({
        "species": {
            "name": name,
            "url": format!("https://pokeapi.co/api/v2/pokemon-species/{}/", id)
        },
        "evolves_to": evolves_to
    })
}

/// bulbasaur -> ivysaur -> venusaur
pub fn evolution_chain() -> JsonValue {
    let venusaur = chain_link(3, "venusaur", vec![]);
    let ivysaur = chain_link(2, "ivysaur", vec![venusaur]);
    json!({ "id": 1, "chain": chain_link(1, "bulbasaur", vec![ivysaur]) })
}

fn handle_connection(mut stream: TcpStream) {
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    let Ok(n) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(&buffer[..n]);
    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();

    if parts.len() < 2 || parts[0] != "GET" {
        send_response(&mut stream, 405, "Method Not Allowed", r#"{"error":"method"}"#);
        return;
    }

    let (path, query) = match parts[1].split_once('?') {
        Some((p, q)) => (p, q),
        None => (parts[1], ""),
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["pokemon"] => {
            let limit = query_param(query, "limit").unwrap_or(20);
            let offset = query_param(query, "offset").unwrap_or(0);
            let all = dataset();
            let results: Vec<JsonValue> = all
                .iter()
                .skip(offset)
                .take(limit)
                .map(|p| {
                    json!({
                        "name": p["name"],
                        "url": format!("http://127.0.0.1/pokemon/{}/", p["id"])
                    })
                })
                .collect();
            let next = if offset + limit < all.len() {
                JsonValue::String(format!("/pokemon?limit={}&offset={}", limit, offset + limit))
            } else {
                JsonValue::Null
            };
            let body = json!({ "count": all.len(), "next": next, "previous": null, "results": results });
            send_response(&mut stream, 200, "OK", &body.to_string());
        }
        ["pokemon", key] => {
            let found = dataset()
                .into_iter()
                .find(|p| p["name"] == *key || p["id"].to_string() == *key);
            match found {
                Some(p) => send_response(&mut stream, 200, "OK", &p.to_string()),
                None => send_response(&mut stream, 404, "Not Found", "Not Found"),
            }
        }
        ["pokemon-species", "500"] => {
            send_response(&mut stream, 500, "Internal Server Error", "oops");
        }
        ["pokemon-species", "1"] => {
            let body = json!({
                "id": 1,
                "name": "bulbasaur",
                "evolution_chain": { "url": "https://pokeapi.co/api/v2/evolution-chain/1/" }
            });
            send_response(&mut stream, 200, "OK", &body.to_string());
        }
        ["evolution-chain", "1"] => {
            send_response(&mut stream, 200, "OK", &evolution_chain().to_string());
        }
        _ => send_response(&mut stream, 404, "Not Found", "Not Found"),
    }
}

fn query_param(query: &str, name: &str) -> Option<usize> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| v.parse().ok())
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
