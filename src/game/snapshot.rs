//! Immutable per-tick snapshots handed to agents and loggers

use serde::{Deserialize, Serialize};

use super::entities::{Ball, Player};
use super::{GameError, TeamId};

/// Match status as seen from outside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Running,
    Ended,
}

/// Player state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
    pub team_id: TeamId,
    pub player_id: u32,
    /// Ticks until the player may kick again (0 = can kick)
    pub kick_cooldown: u32,
}

impl PlayerState {
    pub fn can_kick(&self) -> bool {
        self.kick_cooldown == 0
    }

    /// Distance from this player's center to a point
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

impl From<&Player> for PlayerState {
    fn from(p: &Player) -> Self {
        Self {
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            radius: p.radius,
            mass: p.mass,
            team_id: p.team_id,
            player_id: p.player_id,
            kick_cooldown: p.kick_cooldown,
        }
    }
}

/// Ball state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
}

impl From<&Ball> for BallState {
    fn from(b: &Ball) -> Self {
        Self {
            x: b.x,
            y: b.y,
            vx: b.vx,
            vy: b.vy,
            radius: b.radius,
            mass: b.mass,
        }
    }
}

/// Full match snapshot. Owns all of its data, so later engine mutation never
/// shows through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub ball: BallState,
    /// Goals per team, indexed by team id
    pub score: [u32; 2],
    pub tick: u32,
    pub status: GameStatus,
    pub field_width: f32,
    pub field_height: f32,
    pub goal_height: f32,
}

impl GameState {
    /// Look up one player. A miss means the caller asked for a player that
    /// does not exist in this match.
    pub fn player(&self, team_id: TeamId, player_id: u32) -> Result<&PlayerState, GameError> {
        self.players
            .iter()
            .find(|p| p.team_id == team_id && p.player_id == player_id)
            .ok_or(GameError::PlayerNotFound { team_id, player_id })
    }

    pub fn team_players(&self, team_id: TeamId) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(move |p| p.team_id == team_id)
    }

    /// x of the goal line a team defends
    pub fn own_goal_x(&self, team_id: TeamId) -> f32 {
        if team_id == 0 {
            0.0
        } else {
            self.field_width
        }
    }
}
