//! Configuration module - environment variable parsing

mod game;

pub use game::GameConfig;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::agents::Lineup;

/// Runner configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Seed for kickoff and reset randomness (random when unset)
    pub seed: Option<u64>,
    /// Which scripted agents play
    pub lineup: Lineup,

    /// Where the match log is written (timestamped name when unset)
    pub log_path: Option<PathBuf>,
    /// Skip writing a match log entirely
    pub log_disabled: bool,
    /// Record every N-th tick
    pub log_interval: u32,

    /// Pace ticks at `ticks_per_second` instead of running flat out
    pub realtime: bool,

    /// Match constants
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = GameConfig::default();
        let game = GameConfig {
            players_per_team: parse_var("PLAYERS_PER_TEAM", defaults.players_per_team)?,
            max_ticks: parse_var("MAX_TICKS", defaults.max_ticks)?,
            win_score: parse_var("WIN_SCORE", defaults.win_score)?,
            agent_timeout_ms: parse_var("AGENT_TIMEOUT_MS", defaults.agent_timeout_ms)?,
            ..defaults
        };
        game.validate()?;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            seed: optional_var("MATCH_SEED")?,
            lineup: parse_var("MATCH_LINEUP", Lineup::Mixed)?,

            log_path: env::var("MATCH_LOG_PATH").ok().map(PathBuf::from),
            log_disabled: parse_var("MATCH_LOG_DISABLED", false)?,
            log_interval: parse_var("MATCH_LOG_INTERVAL", 1u32)?.max(1),

            realtime: parse_var("MATCH_REALTIME", false)?,

            game,
        })
    }
}

fn optional_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { key, value }),
        Err(_) => Ok(None),
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(optional_var(key)?.unwrap_or(default))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {key}: {value:?}")]
    Parse { key: &'static str, value: String },

    #[error("Invalid configuration field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
