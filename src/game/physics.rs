//! Movement, containment and collision physics

use crate::config::GameConfig;

use super::entities::{Ball, Body, Goal, Player};
use super::{opponent, TeamId};

/// Passes of the collision solver per tick
pub const COLLISION_MAX_ITERATIONS: usize = 10;

/// Below this distance two points count as coincident
const EPSILON: f32 = 0.001;

/// Physics system for moving and separating entities.
///
/// Holds no state of its own beyond the constants it was built with.
#[derive(Debug, Clone)]
pub struct PhysicsSystem {
    config: GameConfig,
}

impl PhysicsSystem {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Add a player's requested acceleration to its velocity.
    ///
    /// Both the acceleration and the resulting velocity are clamped by
    /// magnitude, preserving direction.
    pub fn apply_acceleration(&self, player: &mut Player, ax: f32, ay: f32) {
        let (ax, ay) = clamp_magnitude(ax, ay, self.config.player_max_acceleration);
        player.vx += ax;
        player.vy += ay;
        clamp_speed(player, self.config.player_max_speed);
    }

    /// Euler step for every entity, then ball friction
    pub fn update_positions(&self, players: &mut [Player], ball: &mut Ball) {
        for player in players.iter_mut() {
            player.x += player.vx;
            player.y += player.vy;
        }

        ball.x += ball.vx;
        ball.y += ball.vy;

        ball.vx *= self.config.ball_friction;
        ball.vy *= self.config.ball_friction;
        clamp_speed(ball, self.config.ball_max_speed);
    }

    /// Center of the corner arc whose region contains (x, y), if any
    fn corner_center(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let w = self.config.field_width;
        let h = self.config.field_height;
        let r = self.config.corner_radius;

        let left = x < r;
        let right = x > w - r;
        let top = y < r;
        let bottom = y > h - r;

        match (left, right, top, bottom) {
            (true, _, true, _) => Some((r, r)),
            (_, true, true, _) => Some((w - r, r)),
            (true, _, _, true) => Some((r, h - r)),
            (_, true, _, true) => Some((w - r, h - r)),
            _ => None,
        }
    }

    /// Keep an entity inside the rounded field.
    ///
    /// The ball may leave through the left and right walls while inside the
    /// goal mouth's vertical span.
    pub fn enforce_boundary<B: Body>(&self, entity: &mut B, radius: f32, is_ball: bool) {
        let w = self.config.field_width;
        let h = self.config.field_height;
        let restitution = if is_ball {
            self.config.ball_wall_restitution
        } else {
            self.config.player_wall_restitution
        };

        let (mut x, mut y) = entity.position();
        let (mut vx, mut vy) = entity.velocity();

        if let Some((cx, cy)) = self.corner_center(x, y) {
            let dx = x - cx;
            let dy = y - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let max_dist = self.config.corner_radius - radius;

            if dist > max_dist && dist > EPSILON {
                let nx = dx / dist;
                let ny = dy / dist;
                x = cx + nx * max_dist;
                y = cy + ny * max_dist;

                // Radial speed d leaves the arc as (1 - 2e) * d
                let outward = vx * nx + vy * ny;
                if outward > 0.0 {
                    vx -= 2.0 * restitution * outward * nx;
                    vy -= 2.0 * restitution * outward * ny;
                }

                entity.set_position(x, y);
                entity.set_velocity(vx, vy);
            }
            return;
        }

        let (goal_top, goal_bottom) = self.config.goal_span();
        let in_goal_mouth = is_ball && goal_top <= y && y <= goal_bottom;

        if x - radius < 0.0 && !in_goal_mouth {
            x = radius;
            if vx < 0.0 {
                vx = -vx * restitution;
            }
        }
        if x + radius > w && !in_goal_mouth {
            x = w - radius;
            if vx > 0.0 {
                vx = -vx * restitution;
            }
        }
        if y - radius < 0.0 {
            y = radius;
            if vy < 0.0 {
                vy = -vy * restitution;
            }
        }
        if y + radius > h {
            y = h - radius;
            if vy > 0.0 {
                vy = -vy * restitution;
            }
        }

        entity.set_position(x, y);
        entity.set_velocity(vx, vy);
    }

    /// Separate two overlapping circles and exchange an impulse along the
    /// contact normal.
    ///
    /// Each circle moves by the overlap times the *other* circle's share of
    /// the total mass. Returns whether the circles overlapped.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_circle_collision<A: Body, B: Body>(
        &self,
        e1: &mut A,
        r1: f32,
        e2: &mut B,
        r2: f32,
        m1: f32,
        m2: f32,
        restitution: f32,
    ) -> bool {
        let (x1, y1) = e1.position();
        let (x2, y2) = e2.position();
        let dx = x2 - x1;
        let dy = y2 - y1;
        let dist = (dx * dx + dy * dy).sqrt();
        let min_dist = r1 + r2;

        if dist >= min_dist {
            return false;
        }

        // Coincident centers: any axis will do
        let (nx, ny) = if dist < EPSILON {
            (1.0, 0.0)
        } else {
            (dx / dist, dy / dist)
        };

        let overlap = min_dist - dist;
        let total_mass = m1 + m2;
        let push1 = overlap * (m2 / total_mass);
        let push2 = overlap * (m1 / total_mass);
        e1.set_position(x1 - nx * push1, y1 - ny * push1);
        e2.set_position(x2 + nx * push2, y2 + ny * push2);

        let (v1x, v1y) = e1.velocity();
        let (v2x, v2y) = e2.velocity();
        let normal_speed = (v2x - v1x) * nx + (v2y - v1y) * ny;

        if normal_speed < 0.0 {
            let j = -(1.0 + restitution) * normal_speed / (1.0 / m1 + 1.0 / m2);
            e1.set_velocity(v1x - j / m1 * nx, v1y - j / m1 * ny);
            e2.set_velocity(v2x + j / m2 * nx, v2y + j / m2 * ny);
        }

        true
    }

    /// Iterate boundary and pairwise resolution until a pass is clean or the
    /// iteration cap is hit. Residual overlap after the cap is accepted.
    pub fn handle_all_collisions(&self, players: &mut [Player], ball: &mut Ball, _goals: &[Goal]) {
        for _ in 0..COLLISION_MAX_ITERATIONS {
            let mut had_collision = false;

            self.enforce_all_boundaries(players, ball);

            for player in players.iter_mut() {
                let (pr, pm, br, bm) = (player.radius, player.mass, ball.radius, ball.mass);
                if self.resolve_circle_collision(
                    player,
                    pr,
                    ball,
                    br,
                    pm,
                    bm,
                    self.config.ball_player_restitution,
                ) {
                    had_collision = true;
                }
            }

            for j in 1..players.len() {
                let (head, tail) = players.split_at_mut(j);
                let p2 = &mut tail[0];
                for p1 in head.iter_mut() {
                    let (r1, m1, r2, m2) = (p1.radius, p1.mass, p2.radius, p2.mass);
                    if self.resolve_circle_collision(
                        p1,
                        r1,
                        p2,
                        r2,
                        m1,
                        m2,
                        self.config.player_player_restitution,
                    ) {
                        had_collision = true;
                    }
                }
            }

            self.enforce_all_boundaries(players, ball);

            if !had_collision {
                break;
            }
        }

        for player in players.iter_mut() {
            clamp_speed(player, self.config.player_max_speed);
        }
        clamp_speed(ball, self.config.ball_max_speed);
    }

    fn enforce_all_boundaries(&self, players: &mut [Player], ball: &mut Ball) {
        for player in players.iter_mut() {
            let radius = player.radius;
            self.enforce_boundary(player, radius, false);
        }
        let radius = ball.radius;
        self.enforce_boundary(ball, radius, true);
    }

    /// Team that scored, if the whole ball is past a goal line inside its
    /// mouth.
    pub fn check_goal(&self, ball: &Ball, goals: &[Goal]) -> Option<TeamId> {
        for goal in goals {
            if !goal.spans(ball.y) {
                continue;
            }

            let crossed = if goal.team_id == 0 {
                ball.x + ball.radius <= 0.0
            } else {
                ball.x - ball.radius >= self.config.field_width
            };

            if crossed {
                return Some(opponent(goal.team_id));
            }
        }
        None
    }
}

/// Scale (x, y) down to `max` magnitude if it exceeds it
fn clamp_magnitude(x: f32, y: f32, max: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();
    if magnitude > max {
        let scale = max / magnitude;
        (x * scale, y * scale)
    } else {
        (x, y)
    }
}

fn clamp_speed<B: Body>(entity: &mut B, max_speed: f32) {
    let (vx, vy) = entity.velocity();
    let (vx, vy) = clamp_magnitude(vx, vy, max_speed);
    entity.set_velocity(vx, vy);
}
