//! Speed and containment invariants under arbitrary player input

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use soccer_sim::agents::ChaserAgent;
use soccer_sim::config::GameConfig;
use soccer_sim::game::{
    Action, Agent, GameMatch, GameState, MatchState, Participant, PhysicsSystem, Player, PlayerKey,
};

const TOLERANCE: f32 = 1e-3;

/// Inside the field with its rounded corners
fn contained(x: f32, y: f32, r: f32, config: &GameConfig) -> bool {
    let (w, h, c) = (config.field_width, config.field_height, config.corner_radius);

    let in_rect = x >= r - TOLERANCE
        && x <= w - r + TOLERANCE
        && y >= r - TOLERANCE
        && y <= h - r + TOLERANCE;

    let cx = if x < c {
        c
    } else if x > w - c {
        w - c
    } else {
        return in_rect;
    };
    let cy = if y < c {
        c
    } else if y > h - c {
        h - c
    } else {
        return in_rect;
    };

    let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    in_rect && dist <= c - r + TOLERANCE
}

/// Flails around and kicks whenever the dice say so
struct RandomKicker {
    rng: ChaCha8Rng,
    kick_chance: f64,
}

impl Agent for RandomKicker {
    fn act(&mut self, _state: &GameState, _me: PlayerKey) -> anyhow::Result<Action> {
        Ok(Action {
            ax: self.rng.gen_range(-2.0..2.0),
            ay: self.rng.gen_range(-2.0..2.0),
            kick: self.rng.gen_bool(self.kick_chance),
        })
    }
}

fn kicking_match(seed: u64, kick_chance: f64, max_ticks: u32) -> GameMatch {
    let config = GameConfig {
        max_ticks,
        win_score: 50,
        goal_celebration_ticks: 5,
        agent_timeout_ms: 500,
        ..GameConfig::default()
    };
    let mut participants = Vec::new();
    for team_id in 0..2 {
        participants.push(Participant::new(
            PlayerKey::new(team_id, 0),
            RandomKicker {
                rng: ChaCha8Rng::seed_from_u64(seed ^ u64::from(team_id)),
                kick_chance,
            },
        ));
        participants.push(Participant::new(
            PlayerKey::new(team_id, 1),
            ChaserAgent::new(&config, seed.wrapping_add(u64::from(team_id))),
        ));
    }
    GameMatch::new(config, participants, seed).unwrap()
}

fn check_tick(state: &MatchState, config: &GameConfig) -> Result<(), TestCaseError> {
    for player in &state.players {
        let speed = (player.vx.powi(2) + player.vy.powi(2)).sqrt();
        prop_assert!(
            speed <= config.player_max_speed + TOLERANCE,
            "tick {} player {}/{} speed {}",
            state.tick,
            player.team_id,
            player.player_id,
            speed
        );
        prop_assert!(
            contained(player.x, player.y, player.radius, config),
            "tick {} player {}/{} escaped at ({}, {})",
            state.tick,
            player.team_id,
            player.player_id,
            player.x,
            player.y
        );
    }

    let ball = &state.ball;
    let ball_speed = (ball.vx.powi(2) + ball.vy.powi(2)).sqrt();
    prop_assert!(
        ball_speed <= config.ball_max_speed + TOLERANCE,
        "tick {} ball speed {}",
        state.tick,
        ball_speed
    );

    let (goal_top, goal_bottom) = config.goal_span();
    if goal_top <= ball.y && ball.y <= goal_bottom {
        // the goal mouth lets the ball through the end lines
        prop_assert!(ball.y >= ball.radius - TOLERANCE);
        prop_assert!(ball.y <= config.field_height - ball.radius + TOLERANCE);
    } else {
        prop_assert!(
            contained(ball.x, ball.y, ball.radius, config),
            "tick {} ball escaped at ({}, {})",
            state.tick,
            ball.x,
            ball.y
        );
    }
    Ok(())
}

fn ticks() -> impl Strategy<Value = Vec<Vec<(f32, f32)>>> {
    prop::collection::vec(
        prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0), 4),
        1..80,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Players never exceed their top speed and never leave the field
    #[test]
    fn players_stay_bounded(
        inputs in ticks(),
        seed in any::<u64>(),
        ball_vx in -15.0f32..15.0,
        ball_vy in -15.0f32..15.0,
    ) {
        let config = GameConfig::default();
        let physics = PhysicsSystem::new(&config);
        let mut state = MatchState::new(&config, seed);
        state.ball.vx = ball_vx;
        state.ball.vy = ball_vy;

        for tick in inputs {
            for (player, (ax, ay)) in state.players.iter_mut().zip(tick) {
                physics.apply_acceleration(player, ax, ay);
            }
            physics.update_positions(&mut state.players, &mut state.ball);
            physics.handle_all_collisions(&mut state.players, &mut state.ball, &state.goals);

            for player in &state.players {
                let speed = (player.vx.powi(2) + player.vy.powi(2)).sqrt();
                prop_assert!(speed <= config.player_max_speed + TOLERANCE, "speed {}", speed);
                prop_assert!(
                    contained(player.x, player.y, player.radius, &config),
                    "escaped at ({}, {})",
                    player.x,
                    player.y
                );
            }

            let ball_speed = (state.ball.vx.powi(2) + state.ball.vy.powi(2)).sqrt();
            prop_assert!(ball_speed <= config.ball_max_speed + TOLERANCE);
            prop_assert!(state.ball.y >= state.ball.radius - TOLERANCE);
            prop_assert!(state.ball.y <= config.field_height - state.ball.radius + TOLERANCE);
        }
    }

    /// Requested acceleration never changes velocity by more than the cap
    #[test]
    fn acceleration_is_capped(ax in -50.0f32..50.0, ay in -50.0f32..50.0) {
        let config = GameConfig::default();
        let physics = PhysicsSystem::new(&config);
        let mut player = Player::new(0, 0, 500.0, 300.0, config.player_radius, config.player_mass);

        physics.apply_acceleration(&mut player, ax, ay);

        let dv = (player.vx.powi(2) + player.vy.powi(2)).sqrt();
        prop_assert!(dv <= config.player_max_acceleration + TOLERANCE);
    }

    /// Full match ticks with kicking agents keep every entity bounded
    #[test]
    fn kicking_matches_stay_bounded(
        seed in any::<u64>(),
        kick_chance in 0.1f64..0.9,
        max_ticks in 50u32..300,
    ) {
        let mut game = kicking_match(seed, kick_chance, max_ticks);
        let config = game.config().clone();

        tokio_test::block_on(async {
            while !game.is_ended() {
                game.step().await;
                check_tick(game.state(), &config)?;
            }
            Ok::<(), TestCaseError>(())
        })?;
        prop_assert_eq!(game.tick(), max_ticks);
    }
}
