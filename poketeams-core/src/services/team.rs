//! Team store - the signed-in user's teams
//!
//! The store is bound to at most one user at a time. While bound, every
//! mutator call rewrites the user's whole collection to the `teams_<user id>`
//! slot. While unbound it holds an empty collection that is never persisted.
//!
//! Mutators never return errors. Missing teams and full rosters leave the
//! collection unchanged and are reported through [`MutationOutcome`]. Storage
//! write failures are logged and exposed via [`TeamStore::last_persist_error`]
//! but do not roll back the in-memory change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::result::Result;
use crate::domain::{MutationOutcome, PokemonSnapshot, Rejection, Team, TeamId, User};
use crate::ports::SlotStore;
use crate::services::logging::{now_ms, LogEvent, LoggingService};

pub struct TeamStore {
    slots: Arc<dyn SlotStore>,
    owner: Option<User>,
    teams: Vec<Team>,
    /// Highest team id handed out by this store instance
    last_issued: i64,
    changes: watch::Sender<Vec<Team>>,
    logger: Option<Arc<LoggingService>>,
    last_persist_error: Option<String>,
}

impl TeamStore {
    /// Unbound store with an empty collection
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            slots,
            owner: None,
            teams: Vec::new(),
            last_issued: 0,
            changes,
            logger: None,
            last_persist_error: None,
        }
    }

    /// Store bound to `user` (or unbound for None)
    pub fn for_user(slots: Arc<dyn SlotStore>, user: Option<User>) -> Self {
        let mut store = Self::new(slots);
        store.bind(user);
        store
    }

    /// Record load/persist failures and mutations in the event log
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Switch to another user's collection (None = signed out)
    ///
    /// The current in-memory collection is dropped without saving; every
    /// earlier mutation has already been persisted.
    pub fn bind(&mut self, user: Option<User>) {
        self.teams = match &user {
            Some(user) => self.load(user),
            None => Vec::new(),
        };
        self.owner = user;
        self.last_persist_error = None;
        self.changes.send_replace(self.teams.clone());
    }

    fn load(&self, user: &User) -> Vec<Team> {
        let key = user.teams_key();
        let raw = match self.slots.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                self.log(LogEvent::new("teams_load_failed").with_error(e.to_string()));
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Team>>(&raw) {
            Ok(teams) => teams,
            Err(e) => {
                self.log(
                    LogEvent::new("teams_load_failed")
                        .with_error("stored teams could not be parsed")
                        .with_error_details(format!("line {} column {}", e.line(), e.column())),
                );
                Vec::new()
            }
        }
    }

    pub fn owner(&self) -> Option<&User> {
        self.owner.as_ref()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Observe the collection. The receiver sees the current value
    /// immediately and every change after it.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Team>> {
        self.changes.subscribe()
    }

    /// Error from the most recent failed write, cleared by the next success
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Append a new empty team and return its id
    ///
    /// The name is stored as given. Callers are expected to trim it and
    /// refuse empty input.
    pub fn create_team(&mut self, name: &str) -> TeamId {
        let id = self.next_team_id();
        self.teams.push(Team::new(id, name));
        self.log(LogEvent::new("team_created"));
        self.commit(true);
        id
    }

    /// Append `snapshot` to the team unless the team is missing or full
    pub fn add_member(&mut self, team_id: TeamId, snapshot: PokemonSnapshot) -> MutationOutcome {
        self.mutate(team_id, "team_member_added", |team| team.push_member(snapshot))
    }

    /// Remove every member of the team whose Pokémon id is `pokemon_id`
    pub fn remove_member(&mut self, team_id: TeamId, pokemon_id: i64) -> MutationOutcome {
        self.mutate(team_id, "team_member_removed", |team| {
            if team.remove_members(pokemon_id) == 0 {
                return Err(Rejection::MemberNotFound {
                    team_id,
                    pokemon_id,
                });
            }
            Ok(())
        })
    }

    /// Move the member at `from` to position `to` within the team
    pub fn reorder(&mut self, team_id: TeamId, from: usize, to: usize) -> MutationOutcome {
        self.mutate(team_id, "team_reordered", |team| team.move_member(from, to))
    }

    fn mutate<F>(&mut self, team_id: TeamId, event: &str, f: F) -> MutationOutcome
    where
        F: FnOnce(&mut Team) -> std::result::Result<(), Rejection>,
    {
        let result = match self.teams.iter_mut().find(|t| t.id == team_id) {
            Some(team) => f(team),
            None => Err(Rejection::TeamNotFound { team_id }),
        };
        let outcome = MutationOutcome::from(result);

        match &outcome {
            MutationOutcome::Applied => self.log(LogEvent::new(event)),
            MutationOutcome::Rejected(reason) => {
                self.log(LogEvent::new("team_mutation_rejected").with_error(reason.to_string()))
            }
        }
        self.commit(outcome.is_applied());
        outcome
    }

    /// Persist after every mutator call, notify observers only on change
    fn commit(&mut self, changed: bool) {
        match self.persist() {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                let message = e.to_string();
                eprintln!("[poketeams] Failed to save teams: {}", message);
                self.log(LogEvent::new("teams_persist_failed").with_error(message.clone()));
                self.last_persist_error = Some(message);
            }
        }
        if changed {
            self.changes.send_replace(self.teams.clone());
        }
    }

    fn persist(&self) -> Result<()> {
        let Some(owner) = &self.owner else {
            return Ok(());
        };
        let serialized = serde_json::to_string(&self.teams)?;
        self.slots.put(&owner.teams_key(), &serialized)
    }

    /// Millisecond timestamp, bumped past every id already issued or loaded
    fn next_team_id(&mut self) -> TeamId {
        let highest_loaded = self.teams.iter().map(|t| t.id.0).max().unwrap_or(0);
        let floor = self.last_issued.max(highest_loaded) + 1;
        let id = now_ms().max(floor);
        self.last_issued = id;
        TeamId(id)
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            // Logging never breaks a team operation
            let _ = logger.log(event);
        }
    }
}
