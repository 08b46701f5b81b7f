//! Match state and authoritative tick loop

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::logging::MatchLogger;
use crate::util::time::{tick_duration, Timer};

use super::decision::{gather_actions, notify_reset, Participant};
use super::entities::{Ball, Goal, Player};
use super::physics::PhysicsSystem;
use super::snapshot::{BallState, GameState, GameStatus, PlayerState};
use super::{Action, GameError, PlayerKey, TeamId};

/// Below this distance a kicker counts as standing on the ball
const KICK_EPSILON: f32 = 0.001;

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Normal play
    Running,
    /// Goal scored, decisions frozen until the countdown runs out
    Celebrating { remaining: u32, scorer: TeamId },
    /// Terminal
    Ended,
}

/// Authoritative entity state for one match
#[derive(Debug, Clone)]
pub struct MatchState {
    pub id: Uuid,
    pub phase: MatchPhase,
    pub tick: u32,
    pub score: [u32; 2],
    pub players: Vec<Player>,
    pub ball: Ball,
    /// Indexed by defending team
    pub goals: [Goal; 2],
    rng: ChaCha8Rng,
}

impl MatchState {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let players = (0..2u8)
            .flat_map(|team_id| {
                config
                    .team_positions(team_id)
                    .into_iter()
                    .enumerate()
                    .map(move |(index, (x, y))| {
                        Player::new(
                            team_id,
                            index as u32,
                            x,
                            y,
                            config.player_radius,
                            config.player_mass,
                        )
                    })
            })
            .collect();

        let (bx, by) = config.ball_position();
        let mid = config.field_height / 2.0;
        let goal = |team_id: TeamId, x: f32| Goal {
            x,
            y: mid,
            width: config.goal_width,
            height: config.goal_height,
            team_id,
        };

        let mut state = Self {
            id: Uuid::new_v4(),
            phase: MatchPhase::Running,
            tick: 0,
            score: [0, 0],
            players,
            ball: Ball::new(bx, by, config.ball_radius, config.ball_mass),
            goals: [goal(0, 0.0), goal(1, config.field_width)],
            rng: ChaCha8Rng::seed_from_u64(seed),
        };

        let (vx, vy) = state.kickoff_velocity(config);
        state.ball.vx = vx;
        state.ball.vy = vy;
        state
    }

    /// Random direction, speed drawn from the configured kickoff range
    fn kickoff_velocity(&mut self, config: &GameConfig) -> (f32, f32) {
        let speed = if config.kickoff_speed_max > config.kickoff_speed_min {
            self.rng
                .gen_range(config.kickoff_speed_min..config.kickoff_speed_max)
        } else {
            config.kickoff_speed_min
        };
        let angle = self.rng.gen_range(0.0..TAU);
        (speed * angle.cos(), speed * angle.sin())
    }

    /// Ball back to the center with a fresh kickoff, players to formation
    pub fn reset_positions(&mut self, config: &GameConfig) {
        let (bx, by) = config.ball_position();
        let (vx, vy) = self.kickoff_velocity(config);
        self.ball.x = bx;
        self.ball.y = by;
        self.ball.vx = vx;
        self.ball.vy = vy;

        let jitter = config.reset_jitter;
        for player in self.players.iter_mut() {
            let (x, y) = config.player_position(player.team_id, player.player_id);
            let (jx, jy) = if jitter > 0.0 {
                (
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                )
            } else {
                (0.0, 0.0)
            };
            player.x = x + jx;
            player.y = y + jy;
            player.vx = 0.0;
            player.vy = 0.0;
            player.kick_cooldown = 0;
        }
    }

    /// Cooldowns tick down first; then every legal kick pushes the ball away
    /// from the kicker when it is in range.
    pub(crate) fn process_kicks(
        &mut self,
        config: &GameConfig,
        actions: &HashMap<PlayerKey, Action>,
    ) {
        for player in self.players.iter_mut() {
            if player.kick_cooldown > 0 {
                player.kick_cooldown -= 1;
            }

            let wants_kick = actions
                .get(&PlayerKey::new(player.team_id, player.player_id))
                .is_some_and(|action| action.kick);
            if !wants_kick || player.kick_cooldown != 0 {
                continue;
            }

            let dx = self.ball.x - player.x;
            let dy = self.ball.y - player.y;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist <= config.kick_range {
                let direction = if dist > KICK_EPSILON {
                    Some((dx / dist, dy / dist))
                } else {
                    let speed = (player.vx * player.vx + player.vy * player.vy).sqrt();
                    (speed > KICK_EPSILON).then(|| (player.vx / speed, player.vy / speed))
                };

                if let Some((nx, ny)) = direction {
                    self.ball.vx += nx * config.kick_power;
                    self.ball.vy += ny * config.kick_power;
                    debug!(
                        team_id = player.team_id,
                        player_id = player.player_id,
                        "Kick"
                    );
                }
            }

            player.kick_cooldown = config.kick_cooldown_ticks;
        }
    }

    /// Owned copy of the current state for agents and loggers
    pub fn snapshot(&self, config: &GameConfig) -> GameState {
        GameState {
            players: self.players.iter().map(PlayerState::from).collect(),
            ball: BallState::from(&self.ball),
            score: self.score,
            tick: self.tick,
            status: if self.phase == MatchPhase::Ended {
                GameStatus::Ended
            } else {
                GameStatus::Running
            },
            field_width: config.field_width,
            field_height: config.field_height,
            goal_height: config.goal_height,
        }
    }
}

/// Drives one match from kickoff to its end
pub struct GameMatch {
    config: GameConfig,
    physics: PhysicsSystem,
    state: MatchState,
    participants: Vec<Participant>,
    logger: Option<Box<dyn MatchLogger>>,
}

impl GameMatch {
    /// Set up a match. Every participant must control an existing player,
    /// and no player may have two.
    pub fn new(
        config: GameConfig,
        participants: Vec<Participant>,
        seed: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let mut seen = HashSet::new();
        for participant in &participants {
            let key = participant.key();
            if key.team_id > 1 || key.player_id >= config.players_per_team {
                return Err(GameError::UnknownParticipant(key));
            }
            if !seen.insert(key) {
                return Err(GameError::DuplicateParticipant(key));
            }
        }

        let state = MatchState::new(&config, seed);
        info!(
            match_id = %state.id,
            seed,
            players_per_team = config.players_per_team,
            participants = participants.len(),
            "Match created"
        );

        Ok(Self {
            physics: PhysicsSystem::new(&config),
            config,
            state,
            participants,
            logger: None,
        })
    }

    pub fn with_logger(mut self, logger: Box<dyn MatchLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn score(&self) -> [u32; 2] {
        self.state.score
    }

    pub fn tick(&self) -> u32 {
        self.state.tick
    }

    pub fn status(&self) -> GameStatus {
        if self.state.phase == MatchPhase::Ended {
            GameStatus::Ended
        } else {
            GameStatus::Running
        }
    }

    pub fn is_ended(&self) -> bool {
        self.state.phase == MatchPhase::Ended
    }

    /// Team with more goals once the match is over; `None` while running or
    /// on a draw.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_ended() {
            return None;
        }
        let [left, right] = self.state.score;
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn snapshot(&self) -> GameState {
        self.state.snapshot(&self.config)
    }

    fn decision_timeout(&self) -> Duration {
        Duration::from_millis(self.config.agent_timeout_ms)
    }

    /// Advance one tick. Returns the scoring team on the tick a goal is
    /// detected and again on the tick it is awarded.
    pub async fn step(&mut self) -> Option<TeamId> {
        if self.is_ended() {
            return None;
        }

        let snapshot = Arc::new(self.snapshot());
        if let Some(logger) = self.logger.as_mut() {
            logger.log_state(&snapshot);
        }

        let scored = match self.state.phase {
            MatchPhase::Celebrating { remaining, scorer } => {
                self.celebrate(remaining, scorer).await
            }
            _ => self.play(snapshot).await,
        };

        self.state.tick += 1;
        if !self.is_ended() && self.state.tick >= self.config.max_ticks {
            self.end("tick_limit");
        }

        scored
    }

    async fn play(&mut self, snapshot: Arc<GameState>) -> Option<TeamId> {
        let actions = gather_actions(&self.participants, snapshot, self.decision_timeout()).await;

        for player in self.state.players.iter_mut() {
            if let Some(action) = actions.get(&PlayerKey::new(player.team_id, player.player_id)) {
                self.physics
                    .apply_acceleration(player, action.ax, action.ay);
            }
        }
        self.state.process_kicks(&self.config, &actions);
        self.advance_physics();

        let scorer = self
            .physics
            .check_goal(&self.state.ball, &self.state.goals)?;
        info!(match_id = %self.state.id, tick = self.state.tick, team_id = scorer, "Goal detected");

        if self.config.goal_celebration_ticks == 0 {
            self.award_goal(scorer).await;
        } else {
            self.state.phase = MatchPhase::Celebrating {
                remaining: self.config.goal_celebration_ticks,
                scorer,
            };
        }
        Some(scorer)
    }

    async fn celebrate(&mut self, remaining: u32, scorer: TeamId) -> Option<TeamId> {
        self.advance_physics();

        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.state.phase = MatchPhase::Celebrating { remaining, scorer };
            return None;
        }

        self.award_goal(scorer).await;
        Some(scorer)
    }

    async fn award_goal(&mut self, scorer: TeamId) {
        self.state.score[scorer as usize] += 1;
        self.state.reset_positions(&self.config);
        self.state.phase = MatchPhase::Running;

        info!(
            match_id = %self.state.id,
            tick = self.state.tick,
            team_id = scorer,
            score = ?self.state.score,
            "Goal awarded, positions reset"
        );

        notify_reset(&self.participants, self.decision_timeout()).await;

        if self.state.score[scorer as usize] >= self.config.win_score {
            self.end("win_score");
        }
    }

    fn advance_physics(&mut self) {
        let MatchState {
            players,
            ball,
            goals,
            ..
        } = &mut self.state;
        self.physics.update_positions(players, ball);
        self.physics.handle_all_collisions(players, ball, goals);
    }

    fn end(&mut self, reason: &'static str) {
        self.state.phase = MatchPhase::Ended;
        info!(
            match_id = %self.state.id,
            tick = self.state.tick,
            score = ?self.state.score,
            reason,
            "Match ended"
        );
    }

    /// Run to completion as fast as decisions allow
    pub async fn run(&mut self) -> Result<[u32; 2], GameError> {
        info!(match_id = %self.state.id, "Match started");
        let timer = Timer::new();

        while !self.is_ended() {
            self.step().await;
        }

        self.finish(&timer)
    }

    /// Run to completion at `ticks_per_second`. Late ticks are skipped rather
    /// than bunched up.
    pub async fn run_paced(&mut self) -> Result<[u32; 2], GameError> {
        info!(
            match_id = %self.state.id,
            tps = self.config.ticks_per_second,
            "Match started"
        );
        let timer = Timer::new();

        let mut tick_interval = interval(tick_duration(self.config.ticks_per_second));
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.is_ended() {
            tick_interval.tick().await;
            self.step().await;
        }

        self.finish(&timer)
    }

    fn finish(&mut self, timer: &Timer) -> Result<[u32; 2], GameError> {
        let final_state = self.snapshot();
        if let Some(logger) = self.logger.as_mut() {
            logger.log_state(&final_state);
            logger.finalize()?;
        }

        info!(
            match_id = %self.state.id,
            ticks = self.state.tick,
            elapsed_ms = timer.elapsed_ms(),
            "Match finished"
        );
        Ok(self.state.score)
    }
}
