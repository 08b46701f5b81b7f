//! 2D soccer match simulation
//!
//! The library owns the authoritative engine:
//! - Physics for circular players and ball on a rounded-corner field
//! - The per-tick state machine (running, goal celebration, ended)
//! - Bounded-time decision gathering from pluggable agents
//! - JSON match logs for replay

pub mod agents;
pub mod config;
pub mod game;
pub mod logging;
pub mod util;

pub use config::{Config, ConfigError, GameConfig};
pub use game::{Action, Agent, GameError, GameMatch, GameState, Participant, PlayerKey};
