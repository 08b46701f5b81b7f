//! Game simulation modules

pub mod decision;
pub mod entities;
pub mod r#match;
pub mod physics;
pub mod snapshot;

pub use decision::{Agent, Participant};
pub use entities::{Ball, Body, Goal, Player};
pub use r#match::{GameMatch, MatchPhase, MatchState};
pub use physics::PhysicsSystem;
pub use snapshot::{BallState, GameState, GameStatus, PlayerState};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Team identifier: 0 defends the left goal, 1 the right one
pub type TeamId = u8;

/// The other team
pub fn opponent(team_id: TeamId) -> TeamId {
    1 - team_id
}

/// Identifies one player across both teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey {
    pub team_id: TeamId,
    pub player_id: u32,
}

impl PlayerKey {
    pub fn new(team_id: TeamId, player_id: u32) -> Self {
        Self { team_id, player_id }
    }
}

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.team_id, self.player_id)
    }
}

/// Decision for one player on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Requested horizontal acceleration
    pub ax: f32,
    /// Requested vertical acceleration
    pub ay: f32,
    /// Attempt a kick this tick
    #[serde(default)]
    pub kick: bool,
}

impl Action {
    pub fn new(ax: f32, ay: f32, kick: bool) -> Self {
        Self { ax, ay, kick }
    }

    /// Replace non-finite components with zero
    pub fn sanitized(self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            ax: finite(self.ax),
            ay: finite(self.ay),
            kick: self.kick,
        }
    }
}

/// Engine errors surfaced to the caller
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Player not found: team={team_id}, player={player_id}")]
    PlayerNotFound { team_id: TeamId, player_id: u32 },

    #[error("Participant {0} has no matching player")]
    UnknownParticipant(PlayerKey),

    #[error("More than one participant controls player {0}")]
    DuplicateParticipant(PlayerKey),

    #[error("Match log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Match log encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
