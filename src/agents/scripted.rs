//! Rule-based players that read only the snapshot

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::game::{Action, Agent, GameState, PlayerKey, PlayerState};

/// Full acceleration from `me` toward a target point
fn steer(me: &PlayerState, tx: f32, ty: f32, max_accel: f32) -> (f32, f32) {
    let dx = tx - me.x;
    let dy = ty - me.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > 0.0 {
        (dx / dist * max_accel, dy / dist * max_accel)
    } else {
        (0.0, 0.0)
    }
}

/// Kick whenever the ball is in reach and the cooldown allows it
fn wants_kick(me: &PlayerState, state: &GameState, kick_range: f32) -> bool {
    me.distance_to(state.ball.x, state.ball.y) <= kick_range && me.can_kick()
}

/// Never moves, never kicks
#[derive(Debug, Default, Clone)]
pub struct IdleAgent;

impl Agent for IdleAgent {
    fn act(&mut self, _state: &GameState, _me: PlayerKey) -> anyhow::Result<Action> {
        Ok(Action::default())
    }
}

/// Random direction, magnitude up to 0.5
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _state: &GameState, _me: PlayerKey) -> anyhow::Result<Action> {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let magnitude = self.rng.gen_range(0.0..0.5);
        Ok(Action::new(angle.cos() * magnitude, angle.sin() * magnitude, false))
    }
}

/// Runs at the ball with a little noise and kicks it when close
#[derive(Debug, Clone)]
pub struct ChaserAgent {
    max_acceleration: f32,
    kick_range: f32,
    noise: f32,
    rng: ChaCha8Rng,
}

impl ChaserAgent {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
            noise: 0.15,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise.max(0.0);
        self
    }
}

impl Agent for ChaserAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let (mut ax, mut ay) = steer(player, state.ball.x, state.ball.y, self.max_acceleration);

        if self.noise > 0.0 {
            ax += self.rng.gen_range(-self.noise..=self.noise);
            ay += self.rng.gen_range(-self.noise..=self.noise);
        }

        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Holds the goal line, sliding with the ball inside the goal mouth
#[derive(Debug, Clone)]
pub struct GoalieAgent {
    max_acceleration: f32,
    kick_range: f32,
    noise: f32,
    rng: ChaCha8Rng,
}

impl GoalieAgent {
    /// Distance kept in front of the goal line
    const LINE_OFFSET: f32 = 50.0;
    /// Margin kept inside the posts
    const POST_MARGIN: f32 = 20.0;

    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
            noise: 0.1,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for GoalieAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;

        let target_x = if me.team_id == 0 {
            Self::LINE_OFFSET
        } else {
            state.field_width - Self::LINE_OFFSET
        };
        let mid = state.field_height / 2.0;
        let half = state.goal_height / 2.0;
        let low = mid - half + Self::POST_MARGIN;
        let high = (mid + half - Self::POST_MARGIN).max(low);
        let target_y = state.ball.y.clamp(low, high);

        let (mut ax, mut ay) = steer(player, target_x, target_y, self.max_acceleration);
        if self.noise > 0.0 {
            ax += self.rng.gen_range(-self.noise..=self.noise);
            ay += self.rng.gen_range(-self.noise..=self.noise);
        }

        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Gets behind the ball relative to the opponent goal, then drives through it
#[derive(Debug, Clone)]
pub struct StrikerAgent {
    max_acceleration: f32,
    kick_range: f32,
}

impl StrikerAgent {
    /// Inside this distance the striker lines up instead of chasing
    const APPROACH_RANGE: f32 = 100.0;
    const BEHIND_OFFSET: f32 = 30.0;

    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
        }
    }
}

impl Agent for StrikerAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let ball = &state.ball;

        let goal_x = state.own_goal_x(crate::game::opponent(me.team_id));
        let goal_y = state.field_height / 2.0;

        let (target_x, target_y) = if player.distance_to(ball.x, ball.y) < Self::APPROACH_RANGE {
            let gx = ball.x - goal_x;
            let gy = ball.y - goal_y;
            let dist = (gx * gx + gy * gy).sqrt();
            if dist > 0.0 {
                (
                    ball.x + gx / dist * Self::BEHIND_OFFSET,
                    ball.y + gy / dist * Self::BEHIND_OFFSET,
                )
            } else {
                (ball.x, ball.y)
            }
        } else {
            (ball.x, ball.y)
        };

        let (ax, ay) = steer(player, target_x, target_y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Shadows the ball from the own-goal side, never leaving its own 40%
#[derive(Debug, Clone)]
pub struct DefenderAgent {
    max_acceleration: f32,
    kick_range: f32,
}

impl DefenderAgent {
    /// Fraction of the ball-to-goal line to stand at
    const COVER: f32 = 0.3;
    const DEPTH: f32 = 0.4;

    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
        }
    }
}

impl Agent for DefenderAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let ball = &state.ball;

        let goal_x = state.own_goal_x(me.team_id);
        let goal_y = state.field_height / 2.0;

        let mut target_x = ball.x + (goal_x - ball.x) * Self::COVER;
        let target_y = ball.y + (goal_y - ball.y) * Self::COVER;
        target_x = if me.team_id == 0 {
            target_x.min(state.field_width * Self::DEPTH)
        } else {
            target_x.max(state.field_width * (1.0 - Self::DEPTH))
        };

        let (ax, ay) = steer(player, target_x, target_y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Runs to where the ball will be after a short look-ahead
#[derive(Debug, Clone)]
pub struct InterceptorAgent {
    max_acceleration: f32,
    kick_range: f32,
    prediction_ticks: f32,
}

impl InterceptorAgent {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
            prediction_ticks: 20.0,
        }
    }
}

impl Agent for InterceptorAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let ball = &state.ball;

        let target_x = (ball.x + ball.vx * self.prediction_ticks).clamp(0.0, state.field_width);
        let target_y = (ball.y + ball.vy * self.prediction_ticks).clamp(0.0, state.field_height);

        let (ax, ay) = steer(player, target_x, target_y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Pushes up with the ball in the opponent half, drops back to the center
/// line otherwise
#[derive(Debug, Clone)]
pub struct MidfielderAgent {
    max_acceleration: f32,
    kick_range: f32,
}

impl MidfielderAgent {
    /// Furthest forward, as a fraction of the field measured from the own goal
    const REACH: f32 = 0.7;
    const HOLD_OFFSET: f32 = 50.0;

    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
        }
    }
}

impl Agent for MidfielderAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let ball = &state.ball;
        let center_x = state.field_width / 2.0;

        let attacking = if me.team_id == 0 {
            ball.x > center_x
        } else {
            ball.x < center_x
        };

        let target_x = match (attacking, me.team_id) {
            (true, 0) => ball.x.min(state.field_width * Self::REACH),
            (true, _) => ball.x.max(state.field_width * (1.0 - Self::REACH)),
            (false, 0) => center_x + Self::HOLD_OFFSET,
            (false, _) => center_x - Self::HOLD_OFFSET,
        };

        let (ax, ay) = steer(player, target_x, ball.y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Straight at the ball, kicking from slightly further out than the others
#[derive(Debug, Clone)]
pub struct AggressorAgent {
    max_acceleration: f32,
    kick_range: f32,
}

impl AggressorAgent {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range + 5.0,
        }
    }
}

impl Agent for AggressorAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let (ax, ay) = steer(player, state.ball.x, state.ball.y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

/// Holds a flank ahead of the ball and only closes in when it comes near
#[derive(Debug, Clone)]
pub struct WingerAgent {
    max_acceleration: f32,
    kick_range: f32,
    /// Flank height; even player ids take the top by default
    preferred_y: Option<f32>,
}

impl WingerAgent {
    const LEAD: f32 = 100.0;
    const ENGAGE_RANGE: f32 = 150.0;

    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_acceleration: config.player_max_acceleration,
            kick_range: config.kick_range,
            preferred_y: None,
        }
    }

    pub fn with_flank(mut self, y: f32) -> Self {
        self.preferred_y = Some(y);
        self
    }
}

impl Agent for WingerAgent {
    fn act(&mut self, state: &GameState, me: PlayerKey) -> anyhow::Result<Action> {
        let player = state.player(me.team_id, me.player_id)?;
        let ball = &state.ball;

        let flank_y = self.preferred_y.unwrap_or(if me.player_id % 2 == 0 {
            state.field_height * 0.2
        } else {
            state.field_height * 0.8
        });

        let (target_x, target_y) =
            if player.distance_to(ball.x, ball.y) < Self::ENGAGE_RANGE {
                (ball.x, ball.y)
            } else if me.team_id == 0 {
                ((ball.x + Self::LEAD).min(state.field_width * 0.8), flank_y)
            } else {
                ((ball.x - Self::LEAD).max(state.field_width * 0.2), flank_y)
            };

        let (ax, ay) = steer(player, target_x, target_y, self.max_acceleration);
        Ok(Action::new(ax, ay, wants_kick(player, state, self.kick_range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BallState, GameError, GameStatus};

    fn player(team_id: u8, player_id: u32, x: f32, y: f32) -> PlayerState {
        PlayerState {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 20.0,
            mass: 1.0,
            team_id,
            player_id,
            kick_cooldown: 0,
        }
    }

    fn state(players: Vec<PlayerState>, ball: (f32, f32)) -> GameState {
        GameState {
            players,
            ball: BallState {
                x: ball.0,
                y: ball.1,
                vx: 0.0,
                vy: 0.0,
                radius: 10.0,
                mass: 0.5,
            },
            score: [0, 0],
            tick: 0,
            status: GameStatus::Running,
            field_width: 1000.0,
            field_height: 600.0,
            goal_height: 120.0,
        }
    }

    #[test]
    fn random_agent_stays_under_half_acceleration() {
        let mut agent = RandomAgent::new(11);
        let snapshot = state(Vec::new(), (500.0, 300.0));
        for _ in 0..100 {
            let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
            assert!((action.ax.powi(2) + action.ay.powi(2)).sqrt() <= 0.5);
            assert!(!action.kick);
        }
    }

    #[test]
    fn chaser_heads_for_ball_and_kicks_in_range() {
        let config = GameConfig::default();
        let mut agent = ChaserAgent::new(&config, 0).with_noise(0.0);

        let far = state(vec![player(0, 0, 100.0, 300.0)], (500.0, 300.0));
        let action = agent.act(&far, PlayerKey::new(0, 0)).unwrap();
        assert!((action.ax - 0.5).abs() < 1e-5);
        assert!(action.ay.abs() < 1e-5);
        assert!(!action.kick);

        let near = state(vec![player(0, 0, 470.0, 300.0)], (500.0, 300.0));
        assert!(agent.act(&near, PlayerKey::new(0, 0)).unwrap().kick);
    }

    #[test]
    fn chaser_waits_out_cooldown() {
        let config = GameConfig::default();
        let mut agent = ChaserAgent::new(&config, 0).with_noise(0.0);
        let mut me = player(0, 0, 470.0, 300.0);
        me.kick_cooldown = 4;

        let action = agent.act(&state(vec![me], (500.0, 300.0)), PlayerKey::new(0, 0)).unwrap();
        assert!(!action.kick);
    }

    #[test]
    fn missing_player_is_an_error() {
        let config = GameConfig::default();
        let mut agent = ChaserAgent::new(&config, 0);
        let err = agent
            .act(&state(Vec::new(), (500.0, 300.0)), PlayerKey::new(1, 3))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::PlayerNotFound {
                team_id: 1,
                player_id: 3
            })
        ));
    }

    #[test]
    fn goalie_tracks_ball_inside_the_posts() {
        let config = GameConfig::default();
        let mut agent = GoalieAgent::new(&config, 0);
        agent.noise = 0.0;

        // Already on the line, ball far above the mouth: moves to the top post margin
        let snapshot = state(vec![player(1, 0, 950.0, 300.0)], (700.0, 50.0));
        let action = agent.act(&snapshot, PlayerKey::new(1, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);
        assert!(action.ay < 0.0);
    }

    #[test]
    fn striker_lines_up_behind_ball() {
        let config = GameConfig::default();
        let mut agent = StrikerAgent::new(&config);

        // Team 0 attacks the right goal; ball between striker and goal
        let snapshot = state(vec![player(0, 0, 600.0, 300.0)], (650.0, 300.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        // Target is 30 units on the far side of the ball from the goal: x = 620
        assert!(action.ax > 0.0);
        assert!(action.ay.abs() < 1e-5);
    }

    #[test]
    fn defender_stays_in_own_half() {
        let config = GameConfig::default();
        let mut agent = DefenderAgent::new(&config);

        // Ball deep in the opponent half: target clamps to x = 400
        let snapshot = state(vec![player(0, 0, 400.0, 300.0)], (900.0, 300.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);

        let snapshot = state(vec![player(1, 0, 600.0, 300.0)], (100.0, 300.0));
        let action = agent.act(&snapshot, PlayerKey::new(1, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);
    }

    #[test]
    fn interceptor_leads_the_ball() {
        let config = GameConfig::default();
        let mut agent = InterceptorAgent::new(&config);
        let mut snapshot = state(vec![player(0, 0, 500.0, 100.0)], (500.0, 300.0));
        // Ball rolling right: 20 ticks ahead it is at (600, 300)
        snapshot.ball.vx = 5.0;

        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        assert!(action.ax > 0.0);
        assert!(action.ay > 0.0);
    }

    #[test]
    fn midfielder_holds_center_when_defending() {
        let config = GameConfig::default();
        let mut agent = MidfielderAgent::new(&config);

        // Ball in the own half: hold at x = 550, track ball y
        let snapshot = state(vec![player(0, 0, 550.0, 300.0)], (200.0, 300.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);
        assert!(action.ay.abs() < 1e-5);

        // Ball deep in the opponent half: push up no further than x = 700
        let snapshot = state(vec![player(0, 0, 700.0, 300.0)], (950.0, 300.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);
    }

    #[test]
    fn aggressor_kicks_from_further_out() {
        let config = GameConfig::default();
        let mut agent = AggressorAgent::new(&config);
        let snapshot = state(vec![player(1, 0, 457.0, 300.0)], (500.0, 300.0));

        let action = agent.act(&snapshot, PlayerKey::new(1, 0)).unwrap();
        assert!(action.kick);
        assert!(action.ax > 0.0);
    }

    #[test]
    fn winger_keeps_to_flank_until_ball_is_near() {
        let config = GameConfig::default();
        let mut agent = WingerAgent::new(&config);

        // Player id 1 takes the bottom flank (y = 480), 100 ahead of the ball
        let snapshot = state(vec![player(0, 1, 600.0, 480.0)], (500.0, 100.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 1)).unwrap();
        assert!(action.ax.abs() < 1e-5);
        assert!(action.ay.abs() < 1e-5);

        let mut agent = WingerAgent::new(&config).with_flank(120.0);
        let snapshot = state(vec![player(0, 0, 600.0, 120.0)], (500.0, 500.0));
        let action = agent.act(&snapshot, PlayerKey::new(0, 0)).unwrap();
        assert!(action.ax.abs() < 1e-5);
        assert!(action.ay.abs() < 1e-5);
    }
}
