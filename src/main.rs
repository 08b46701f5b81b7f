//! Soccer Sim - headless match runner
//!
//! Plays one match between two scripted lineups:
//! - Configuration from the environment (`.env` supported)
//! - Optional JSON match log for replay
//! - Flat-out or real-time pacing

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soccer_sim::config::Config;
use soccer_sim::game::GameMatch;
use soccer_sim::logging::JsonMatchLogger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        lineup = %config.lineup,
        seed,
        players_per_team = config.game.players_per_team,
        "Starting Soccer Sim"
    );

    let participants = config.lineup.participants(&config.game, seed);
    let mut game = GameMatch::new(config.game.clone(), participants, seed)?;

    if !config.log_disabled {
        let logger = JsonMatchLogger::new(&config.game, config.log_path.clone(), config.log_interval);
        info!(path = %logger.path().display(), "Recording match log");
        game = game.with_logger(Box::new(logger));
    }

    let [left, right] = if config.realtime {
        game.run_paced().await?
    } else {
        game.run().await?
    };

    match game.winner() {
        Some(team_id) => info!(left, right, team_id, "Final score"),
        None => info!(left, right, "Final score, draw"),
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
