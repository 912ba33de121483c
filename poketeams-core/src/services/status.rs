//! Status service - summary of the signed-in user's teams

use serde::Serialize;

use crate::domain::{TeamId, MAX_TEAM_SIZE};
use crate::services::TeamStore;

pub struct StatusService;

impl StatusService {
    pub fn new() -> Self {
        Self
    }

    pub fn get_status(&self, store: &TeamStore) -> StatusSummary {
        let teams: Vec<TeamSummary> = store
            .teams()
            .iter()
            .map(|t| TeamSummary {
                id: t.id,
                name: t.name.clone(),
                members: t.len(),
                open_slots: t.open_slots(),
                member_names: t
                    .pokemon
                    .iter()
                    .map(|p| p.name().unwrap_or("?").to_string())
                    .collect(),
            })
            .collect();

        StatusSummary {
            username: store.owner().map(|u| u.username.clone()),
            total_teams: teams.len(),
            total_members: teams.iter().map(|t| t.members).sum(),
            full_teams: teams.iter().filter(|t| t.open_slots == 0).count(),
            max_team_size: MAX_TEAM_SIZE,
            last_persist_error: store.last_persist_error().map(str::to_string),
            teams,
        }
    }
}

impl Default for StatusService {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub username: Option<String>,
    pub total_teams: usize,
    pub total_members: usize,
    pub full_teams: usize,
    pub max_team_size: usize,
    pub last_persist_error: Option<String>,
    pub teams: Vec<TeamSummary>,
}

#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub members: usize,
    pub open_slots: usize,
    pub member_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySlotStore;
    use crate::domain::{PokemonSnapshot, User};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_signed_out_status() {
        let store = TeamStore::new(Arc::new(InMemorySlotStore::new()));
        let status = StatusService::new().get_status(&store);
        assert!(status.username.is_none());
        assert_eq!(status.total_teams, 0);
    }

    #[test]
    fn test_counts() {
        let mut store = TeamStore::for_user(
            Arc::new(InMemorySlotStore::new()),
            Some(User::new("u", "ash")),
        );
        let full = store.create_team("Full");
        for id in 1..=6 {
            store.add_member(full, PokemonSnapshot::new(json!({ "id": id, "name": "mon" })));
        }
        let partial = store.create_team("Partial");
        store.add_member(partial, PokemonSnapshot::new(json!({ "id": 25, "name": "pikachu" })));

        let status = StatusService::new().get_status(&store);
        assert_eq!(status.username.as_deref(), Some("ash"));
        assert_eq!(status.total_teams, 2);
        assert_eq!(status.total_members, 7);
        assert_eq!(status.full_teams, 1);
        assert_eq!(status.teams[1].open_slots, 5);
        assert_eq!(status.teams[1].member_names, vec!["pikachu"]);
    }
}
