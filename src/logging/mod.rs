//! Match log recording for replay and analysis

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::game::{GameError, GameState};

/// Current on-disk log format
pub const LOG_VERSION: &str = "1.0";

/// Receives one snapshot per tick and a final call when the match ends
pub trait MatchLogger: Send {
    fn log_state(&mut self, state: &GameState);
    fn finalize(&mut self) -> Result<(), GameError>;
}

/// A recorded match as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLog {
    pub version: String,
    pub config: GameConfig,
    pub states: Vec<GameState>,
    pub total_ticks: usize,
}

/// Collects snapshots in memory and writes them as one JSON document
pub struct JsonMatchLogger {
    config: GameConfig,
    path: PathBuf,
    /// Keep every N-th tick
    interval: u32,
    states: Vec<GameState>,
    finalized: bool,
}

impl JsonMatchLogger {
    pub fn new(config: &GameConfig, path: Option<PathBuf>, interval: u32) -> Self {
        Self {
            config: config.clone(),
            path: path.unwrap_or_else(default_log_path),
            interval: interval.max(1),
            states: Vec::new(),
            finalized: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn recorded(&self) -> usize {
        self.states.len()
    }
}

impl MatchLogger for JsonMatchLogger {
    fn log_state(&mut self, state: &GameState) {
        if self.finalized {
            return;
        }
        if state.tick % self.interval == 0 {
            self.states.push(state.clone());
        }
    }

    fn finalize(&mut self) -> Result<(), GameError> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;

        let log = MatchLog {
            version: LOG_VERSION.to_string(),
            config: self.config.clone(),
            total_ticks: self.states.len(),
            states: std::mem::take(&mut self.states),
        };

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, &log)?;
        writer.flush()?;

        info!(path = %self.path.display(), states = log.total_ticks, "Match log written");
        Ok(())
    }
}

/// `game_log_<timestamp>.json` in the working directory
pub fn default_log_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("game_log_{timestamp}.json"))
}

/// Read a match log written by [`JsonMatchLogger`]
pub fn load_match_log(path: impl AsRef<Path>) -> Result<MatchLog, GameError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
