//! Outcome of a team mutation
//!
//! Team mutations never fail loudly: a missing team or a full roster leaves
//! state unchanged. The outcome names which of those happened so callers can
//! report it without diffing the collection.

use std::fmt;

use serde::Serialize;

use super::team::{TeamId, MAX_TEAM_SIZE};

/// Why a mutation left the collection unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// No team with this id in the bound collection
    TeamNotFound { team_id: TeamId },
    /// Team already holds the maximum number of members
    TeamFull { team_id: TeamId },
    /// No member with this Pokémon id in the team
    MemberNotFound { team_id: TeamId, pokemon_id: i64 },
    /// Source position of a move is past the end of the roster
    IndexOutOfRange { team_id: TeamId, index: usize, len: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TeamNotFound { team_id } => write!(f, "team {} not found", team_id),
            Rejection::TeamFull { team_id } => {
                write!(f, "team {} already has {} Pokémon", team_id, MAX_TEAM_SIZE)
            }
            Rejection::MemberNotFound { team_id, pokemon_id } => {
                write!(f, "Pokémon #{} is not in team {}", pokemon_id, team_id)
            }
            Rejection::IndexOutOfRange { team_id, index, len } => write!(
                f,
                "position {} is out of range for team {} ({} members)",
                index, team_id, len
            ),
        }
    }
}

/// Result of a team mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied,
    Rejected(Rejection),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            MutationOutcome::Applied => None,
            MutationOutcome::Rejected(r) => Some(*r),
        }
    }
}

impl From<Result<(), Rejection>> for MutationOutcome {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => MutationOutcome::Applied,
            Err(r) => MutationOutcome::Rejected(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let applied: MutationOutcome = Ok(()).into();
        assert!(applied.is_applied());
        assert_eq!(applied.rejection(), None);

        let rejected: MutationOutcome = Err(Rejection::TeamFull { team_id: TeamId(7) }).into();
        assert!(!rejected.is_applied());
        assert_eq!(
            rejected.rejection(),
            Some(Rejection::TeamFull { team_id: TeamId(7) })
        );
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = MutationOutcome::Rejected(Rejection::TeamNotFound { team_id: TeamId(3) });
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "team_not_found");
        assert_eq!(json["team_id"], 3);
    }

    #[test]
    fn test_rejection_display() {
        let r = Rejection::TeamFull { team_id: TeamId(9) };
        assert_eq!(r.to_string(), "team 9 already has 6 Pokémon");
    }
}
