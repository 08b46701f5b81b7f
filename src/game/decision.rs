//! Bounded-time decision gathering from independent agents

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use super::{Action, GameState, PlayerKey};

/// A decision source controlling one player.
///
/// Agents only ever see immutable snapshots. `act` may be slow or fail; the
/// engine substitutes a neutral action when it does.
pub trait Agent: Send {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action>;

    /// Called after a goal once positions are reset
    fn reset(&mut self) {}
}

/// One agent bound to the player it controls
#[derive(Clone)]
pub struct Participant {
    key: PlayerKey,
    agent: Arc<Mutex<Box<dyn Agent>>>,
}

impl Participant {
    pub fn new(key: PlayerKey, agent: impl Agent + 'static) -> Self {
        Self::boxed(key, Box::new(agent))
    }

    pub fn boxed(key: PlayerKey, agent: Box<dyn Agent>) -> Self {
        Self {
            key,
            agent: Arc::new(Mutex::new(agent)),
        }
    }

    pub fn key(&self) -> PlayerKey {
        self.key
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant").field("key", &self.key).finish()
    }
}

/// Ask every participant for an action on the same snapshot.
///
/// Each agent runs on its own blocking task; all of them share one deadline.
/// Late, failed or panicking agents get `Action::default()`. Tasks still
/// running at the deadline are detached and their results dropped.
pub async fn gather_actions(
    participants: &[Participant],
    state: Arc<GameState>,
    timeout: Duration,
) -> HashMap<PlayerKey, Action> {
    let deadline = Instant::now() + timeout;

    let pending = participants.iter().map(|participant| {
        let key = participant.key;
        let agent = participant.agent.clone();
        let state = state.clone();

        let handle = task::spawn_blocking(move || -> anyhow::Result<Action> {
            // A task left over from an earlier tick still owns this agent
            let mut agent = agent
                .try_lock()
                .ok_or_else(|| anyhow!("agent still busy with an earlier tick"))?;
            agent.act(&state, key)
        });

        async move {
            let action = match timeout_at(deadline, handle).await {
                Ok(Ok(Ok(action))) => action.sanitized(),
                Ok(Ok(Err(e))) => {
                    debug!(player = %key, error = %e, "Agent failed, using neutral action");
                    Action::default()
                }
                Ok(Err(e)) => {
                    debug!(player = %key, error = %e, "Agent task aborted, using neutral action");
                    Action::default()
                }
                Err(_) => {
                    debug!(player = %key, "Agent timed out, using neutral action");
                    Action::default()
                }
            };
            (key, action)
        }
    });

    join_all(pending).await.into_iter().collect()
}

/// Tell every participant that positions were reset.
///
/// Bounded by `timeout` like a decision round; an agent that cannot be
/// reached in time misses the notification.
pub async fn notify_reset(participants: &[Participant], timeout: Duration) {
    let deadline = Instant::now() + timeout;

    let pending = participants.iter().map(|participant| {
        let key = participant.key;
        let agent = participant.agent.clone();

        let handle = task::spawn_blocking(move || match agent.try_lock_for(timeout) {
            Some(mut agent) => {
                agent.reset();
                true
            }
            None => false,
        });

        async move {
            match timeout_at(deadline, handle).await {
                Ok(Ok(true)) => {}
                _ => warn!(player = %key, "Agent busy, reset notification skipped"),
            }
        }
    });

    join_all(pending).await;
}
