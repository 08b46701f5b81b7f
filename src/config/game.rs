//! Match constants: field geometry, physics tuning and match rules

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::game::TeamId;

/// Everything the engine needs to run one match.
///
/// Distances are in field units, speeds in units per tick. Friction and
/// restitution values are tuned for feel rather than derived from a real
/// ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    // Field
    pub field_width: f32,
    pub field_height: f32,
    /// Radius of the arc carved out of each field corner
    pub corner_radius: f32,
    pub goal_width: f32,
    /// Vertical span of the goal mouth, centered on the half-way height
    pub goal_height: f32,

    // Entities
    pub player_radius: f32,
    pub player_mass: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,

    // Physics
    pub player_max_speed: f32,
    pub player_max_acceleration: f32,
    pub ball_max_speed: f32,
    /// Per-tick velocity multiplier applied to the ball
    pub ball_friction: f32,
    pub ball_wall_restitution: f32,
    pub player_wall_restitution: f32,
    pub ball_player_restitution: f32,
    pub player_player_restitution: f32,

    // Kicking
    pub kick_range: f32,
    pub kick_power: f32,
    pub kick_cooldown_ticks: u32,

    // Match rules
    pub players_per_team: u32,
    pub win_score: u32,
    pub max_ticks: u32,
    pub goal_celebration_ticks: u32,
    /// Decision window per tick, in milliseconds
    pub agent_timeout_ms: u64,
    pub ticks_per_second: u32,

    // Kickoff
    pub kickoff_speed_min: f32,
    pub kickoff_speed_max: f32,
    /// Max positional jitter applied to players on reset
    pub reset_jitter: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 1000.0,
            field_height: 600.0,
            corner_radius: 60.0,
            goal_width: 10.0,
            goal_height: 120.0,
            player_radius: 20.0,
            player_mass: 1.0,
            ball_radius: 10.0,
            ball_mass: 0.5,
            player_max_speed: 5.0,
            player_max_acceleration: 0.5,
            ball_max_speed: 15.0,
            ball_friction: 0.99,
            ball_wall_restitution: 0.8,
            player_wall_restitution: 0.5,
            ball_player_restitution: 0.9,
            player_player_restitution: 0.5,
            kick_range: 40.0,
            kick_power: 10.0,
            kick_cooldown_ticks: 10,
            players_per_team: 2,
            win_score: 5,
            max_ticks: 3000,
            goal_celebration_ticks: 60,
            agent_timeout_ms: 100,
            ticks_per_second: 60,
            kickoff_speed_min: 2.0,
            kickoff_speed_max: 5.0,
            reset_jitter: 20.0,
        }
    }
}

impl GameConfig {
    /// Reject configurations the engine cannot simulate sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("goal_width", self.goal_width),
            ("goal_height", self.goal_height),
            ("player_radius", self.player_radius),
            ("player_mass", self.player_mass),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("player_max_speed", self.player_max_speed),
            ("player_max_acceleration", self.player_max_acceleration),
            ("ball_max_speed", self.ball_max_speed),
            ("kick_range", self.kick_range),
            ("kick_power", self.kick_power),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("corner_radius", self.corner_radius),
            ("ball_wall_restitution", self.ball_wall_restitution),
            ("player_wall_restitution", self.player_wall_restitution),
            ("ball_player_restitution", self.ball_player_restitution),
            ("player_player_restitution", self.player_player_restitution),
            ("kickoff_speed_min", self.kickoff_speed_min),
            ("reset_jitter", self.reset_jitter),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must not be negative, got {value}")));
            }
        }

        if !(self.ball_friction > 0.0 && self.ball_friction <= 1.0) {
            return Err(ConfigError::invalid("ball_friction", "must be in (0, 1]"));
        }
        if self.kickoff_speed_max < self.kickoff_speed_min {
            return Err(ConfigError::invalid(
                "kickoff_speed_max",
                "must not be below kickoff_speed_min",
            ));
        }
        if self.corner_radius * 2.0 > self.field_width.min(self.field_height) {
            return Err(ConfigError::invalid("corner_radius", "corners overlap each other"));
        }
        if self.corner_radius > 0.0 && self.corner_radius < self.player_radius.max(self.ball_radius) {
            return Err(ConfigError::invalid("corner_radius", "smaller than an entity radius"));
        }
        if self.goal_height > self.field_height - 2.0 * self.corner_radius {
            return Err(ConfigError::invalid("goal_height", "goal mouth reaches into a corner arc"));
        }
        if self.players_per_team == 0 {
            return Err(ConfigError::invalid("players_per_team", "need at least one player"));
        }
        if self.win_score == 0 {
            return Err(ConfigError::invalid("win_score", "must be at least 1"));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::invalid("max_ticks", "must be at least 1"));
        }
        if self.agent_timeout_ms == 0 {
            return Err(ConfigError::invalid("agent_timeout_ms", "must be at least 1"));
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::invalid("ticks_per_second", "must be at least 1"));
        }

        Ok(())
    }

    /// Formation slot for a player. Team 1 mirrors team 0 across the
    /// half-way line.
    pub fn player_position(&self, team_id: TeamId, index: u32) -> (f32, f32) {
        let n = self.players_per_team;
        let (x, y) = if n <= 1 {
            (self.field_width * 0.25, self.field_height / 2.0)
        } else if index == 0 {
            (self.field_width * 0.1, self.field_height / 2.0)
        } else {
            let outfield = n - 1;
            let slot = (index - 1).min(outfield - 1);
            (
                self.field_width * 0.3,
                self.field_height * (slot + 1) as f32 / (outfield + 1) as f32,
            )
        };

        if team_id == 0 {
            (x, y)
        } else {
            (self.field_width - x, y)
        }
    }

    /// Every formation slot for one team, in player order.
    pub fn team_positions(&self, team_id: TeamId) -> Vec<(f32, f32)> {
        (0..self.players_per_team)
            .map(|i| self.player_position(team_id, i))
            .collect()
    }

    /// Kickoff spot
    pub fn ball_position(&self) -> (f32, f32) {
        (self.field_width / 2.0, self.field_height / 2.0)
    }

    /// Top and bottom y of the goal mouth
    pub fn goal_span(&self) -> (f32, f32) {
        let mid = self.field_height / 2.0;
        (mid - self.goal_height / 2.0, mid + self.goal_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_radius_and_mass() {
        let config = GameConfig {
            player_radius: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "player_radius", .. })
        ));

        let config = GameConfig {
            ball_mass: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "ball_mass", .. })
        ));
    }

    #[test]
    fn rejects_goal_mouth_inside_corner() {
        let config = GameConfig {
            goal_height: 500.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "goal_height", .. })
        ));
    }

    #[test]
    fn formation_is_deterministic_and_mirrored() {
        let config = GameConfig {
            players_per_team: 3,
            ..GameConfig::default()
        };
        let left = config.team_positions(0);
        let right = config.team_positions(1);
        assert_eq!(left, config.team_positions(0));
        assert_eq!(left.len(), 3);

        for ((lx, ly), (rx, ry)) in left.iter().zip(right.iter()) {
            assert!((lx + rx - config.field_width).abs() < 1e-4);
            assert_eq!(ly, ry);
        }

        // keeper in front of goal, outfield spread vertically
        assert_eq!(left[0], (100.0, 300.0));
        assert_eq!(left[1], (300.0, 200.0));
        assert_eq!(left[2], (300.0, 400.0));
    }

    #[test]
    fn single_player_team_starts_at_quarter_field() {
        let config = GameConfig {
            players_per_team: 1,
            ..GameConfig::default()
        };
        assert_eq!(config.player_position(0, 0), (250.0, 300.0));
        assert_eq!(config.player_position(1, 0), (750.0, 300.0));
    }
}
