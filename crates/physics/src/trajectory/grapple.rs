//! Grapple launch arc.
//!
//! The actor is thrown on a parabola that climbs to `overshoot_height`
//! above the higher of its start and the target, then drops onto the
//! target. The rise uses ascend gravity and the drop fast-fall gravity, so
//! the two halves have different durations; the horizontal speed is chosen
//! so the lateral distance is covered in exactly their sum.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::movement::GravityModel;

/// Combined flight times shorter than this launch straight up.
const MIN_FLIGHT_TIME: f32 = 1e-5;

/// A solved grapple trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrappleArc {
    pub start: Vec3,
    pub target: Vec3,
    /// Apex height relative to the start.
    pub apex: f32,
    pub initial_vertical_speed: f32,
    pub initial_horizontal_speed: f32,
    pub time_up: f32,
    pub time_down: f32,
    ascend_gravity: f32,
    fast_fall_gravity: f32,
}

impl GrappleArc {
    /// Solve the arc from `start` through `target`.
    pub fn solve(start: Vec3, target: Vec3, overshoot_height: f32, gravity: &GravityModel) -> Self {
        let overshoot_height = overshoot_height.max(0.0);
        let horizontal_distance = target.x - start.x;
        let vertical_distance = target.y - start.y;

        let apex = if vertical_distance < 0.0 {
            overshoot_height
        } else {
            vertical_distance + overshoot_height
        };

        let g_up = gravity.ascend_gravity;
        let g_down = gravity.fast_fall_gravity;

        let initial_vertical_speed = (-2.0 * g_up * apex).max(0.0).sqrt();
        let time_up = (-2.0 * apex / g_up).max(0.0).sqrt();
        let time_down = (-2.0 * (apex - vertical_distance) / g_down).max(0.0).sqrt();

        let flight_time = time_up + time_down;
        let initial_horizontal_speed = if flight_time > MIN_FLIGHT_TIME {
            horizontal_distance / flight_time
        } else {
            0.0
        };

        Self {
            start,
            target,
            apex,
            initial_vertical_speed,
            initial_horizontal_speed,
            time_up,
            time_down,
            ascend_gravity: g_up,
            fast_fall_gravity: g_down,
        }
    }

    /// Planar launch velocity.
    pub fn launch_velocity(&self) -> Vec2 {
        Vec2::new(self.initial_horizontal_speed, self.initial_vertical_speed)
    }

    /// Total time from launch to the target.
    pub fn flight_time(&self) -> f32 {
        self.time_up + self.time_down
    }

    /// Position along the arc `t` seconds after launch.
    pub fn position_at(&self, t: f32) -> Vec3 {
        let t = t.max(0.0);
        let x = self.start.x + self.initial_horizontal_speed * t;

        let y = if t <= self.time_up {
            self.start.y + self.initial_vertical_speed * t + 0.5 * self.ascend_gravity * t * t
        } else {
            let falling = t - self.time_up;
            self.start.y + self.apex + 0.5 * self.fast_fall_gravity * falling * falling
        };

        Vec3::new(x, y, self.start.z)
    }

    /// Evenly spaced points from launch to target, for path previews.
    pub fn sample_points(&self, count: usize) -> Vec<Vec3> {
        if count < 2 {
            return vec![self.start];
        }

        let step = self.flight_time() / (count - 1) as f32;
        (0..count).map(|i| self.position_at(i as f32 * step)).collect()
    }
}
