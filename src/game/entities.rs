//! Live, mutable match entities owned by the engine

use serde::{Deserialize, Serialize};

use super::TeamId;

/// A circle the physics system can move
pub trait Body {
    fn position(&self) -> (f32, f32);
    fn velocity(&self) -> (f32, f32);
    fn set_position(&mut self, x: f32, y: f32);
    fn set_velocity(&mut self, vx: f32, vy: f32);

    fn speed(&self) -> f32 {
        let (vx, vy) = self.velocity();
        (vx * vx + vy * vy).sqrt()
    }
}

macro_rules! impl_body {
    ($($ty:ty),+) => {
        $(
            impl Body for $ty {
                fn position(&self) -> (f32, f32) {
                    (self.x, self.y)
                }

                fn velocity(&self) -> (f32, f32) {
                    (self.vx, self.vy)
                }

                fn set_position(&mut self, x: f32, y: f32) {
                    self.x = x;
                    self.y = y;
                }

                fn set_velocity(&mut self, vx: f32, vy: f32) {
                    self.vx = vx;
                    self.vy = vy;
                }
            }
        )+
    };
}

impl_body!(Player, Ball);

/// Player state (authoritative)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
    pub team_id: TeamId,
    /// Unique within the team
    pub player_id: u32,
    /// Ticks until the next kick is legal
    pub kick_cooldown: u32,
}

impl Player {
    pub fn new(team_id: TeamId, player_id: u32, x: f32, y: f32, radius: f32, mass: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            mass,
            team_id,
            player_id,
            kick_cooldown: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32, mass: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            mass,
        }
    }
}

/// A goal mouth at one end of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Team that defends this goal
    pub team_id: TeamId,
}

impl Goal {
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Whether `y` lies within the mouth's vertical span
    pub fn spans(&self, y: f32) -> bool {
        self.top() <= y && y <= self.bottom()
    }
}
