//! Scripted decision sources and team lineups

pub mod scripted;

pub use scripted::{
    AggressorAgent, ChaserAgent, DefenderAgent, GoalieAgent, IdleAgent, InterceptorAgent,
    MidfielderAgent, RandomAgent, StrikerAgent, WingerAgent,
};

use std::fmt;
use std::str::FromStr;

use crate::config::GameConfig;
use crate::game::{Agent, Participant, PlayerKey, TeamId};

/// Preset team compositions. Both teams always field the same lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lineup {
    Idle,
    Random,
    Chaser,
    /// Goalie plus chasers
    #[default]
    Mixed,
    /// Goalie, defender, then strikers
    Tactical,
    /// Everyone chases at full tilt
    Aggressive,
    /// Goalie plus interceptors
    Interceptor,
    /// Goalie, midfielder, then strikers
    Balanced,
    /// Goalie plus wingers
    Wings,
}

impl Lineup {
    /// Agent for one player slot
    fn agent(self, config: &GameConfig, key: PlayerKey, seed: u64) -> Box<dyn Agent> {
        let index = key.player_id;
        match self {
            Lineup::Idle => Box::new(IdleAgent),
            Lineup::Random => Box::new(RandomAgent::new(seed)),
            Lineup::Chaser => Box::new(ChaserAgent::new(config, seed)),
            Lineup::Mixed if index == 0 => Box::new(GoalieAgent::new(config, seed)),
            Lineup::Mixed => Box::new(ChaserAgent::new(config, seed)),
            Lineup::Tactical => match index {
                0 => Box::new(GoalieAgent::new(config, seed)),
                1 => Box::new(DefenderAgent::new(config)),
                _ => Box::new(StrikerAgent::new(config)),
            },
            Lineup::Aggressive => Box::new(AggressorAgent::new(config)),
            Lineup::Interceptor if index == 0 => Box::new(GoalieAgent::new(config, seed)),
            Lineup::Interceptor => Box::new(InterceptorAgent::new(config)),
            Lineup::Balanced => match index {
                0 => Box::new(GoalieAgent::new(config, seed)),
                1 => Box::new(MidfielderAgent::new(config)),
                _ => Box::new(StrikerAgent::new(config)),
            },
            Lineup::Wings if index == 0 => Box::new(GoalieAgent::new(config, seed)),
            Lineup::Wings => Box::new(WingerAgent::new(config)),
        }
    }

    /// One participant per player on both teams. Each agent gets its own
    /// seed derived from `seed`.
    pub fn participants(self, config: &GameConfig, seed: u64) -> Vec<Participant> {
        (0..2 as TeamId)
            .flat_map(|team_id| {
                (0..config.players_per_team).map(move |player_id| PlayerKey::new(team_id, player_id))
            })
            .map(|key| {
                let agent_seed = seed
                    .wrapping_mul(31)
                    .wrapping_add((u64::from(key.team_id) << 32) | u64::from(key.player_id));
                Participant::boxed(key, self.agent(config, key, agent_seed))
            })
            .collect()
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lineup::Idle => "idle",
            Lineup::Random => "random",
            Lineup::Chaser => "chaser",
            Lineup::Mixed => "mixed",
            Lineup::Tactical => "tactical",
            Lineup::Aggressive => "aggressive",
            Lineup::Interceptor => "interceptor",
            Lineup::Balanced => "balanced",
            Lineup::Wings => "wings",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown lineup: {0}")]
pub struct UnknownLineup(String);

impl FromStr for Lineup {
    type Err = UnknownLineup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(Lineup::Idle),
            "random" => Ok(Lineup::Random),
            "chaser" => Ok(Lineup::Chaser),
            "mixed" => Ok(Lineup::Mixed),
            "tactical" => Ok(Lineup::Tactical),
            "aggressive" => Ok(Lineup::Aggressive),
            "interceptor" => Ok(Lineup::Interceptor),
            "balanced" => Ok(Lineup::Balanced),
            "wings" => Ok(Lineup::Wings),
            _ => Err(UnknownLineup(s.to_string())),
        }
    }
}
