//! Throw arcs and suction attraction.
//!
//! A held object is launched along a direction with a speed that depends
//! on how long the throw was charged. The preview samples the ballistic
//! path at fixed time steps and stops at the first obstructed segment.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionLayers, CollisionWorld};

/// Launch speed that reaches `max_height` straight up under `gravity`.
pub fn launch_speed(gravity: f32, max_height: f32) -> f32 {
    (2.0 * gravity.abs() * max_height.max(0.0)).sqrt()
}

/// Throw velocity along `direction`, scaled by charge.
///
/// The full launch speed is split by the angle between `direction` and up;
/// the horizontal sign follows `direction.x`. `hold_time / max_hold_time`
/// scales the result and is clamped to [0, 1].
pub fn throw_velocity(
    direction: Vec3,
    max_height: f32,
    gravity: f32,
    hold_time: f32,
    max_hold_time: f32,
) -> Vec2 {
    if direction.length_squared() < 1e-8 {
        return Vec2::ZERO;
    }

    let speed = launch_speed(gravity, max_height);
    let angle = direction.angle_between(Vec3::Y);
    let side = if direction.x < 0.0 { -1.0 } else { 1.0 };

    let charge = if max_hold_time > 0.0 {
        (hold_time / max_hold_time).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Vec2::new(side * speed * angle.sin(), speed * angle.cos()) * charge
}

/// Ballistic arc preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowArc {
    pub start: Vec3,
    pub velocity: Vec2,
    /// Signed vertical gravity.
    pub gravity: f32,
}

impl ThrowArc {
    pub fn new(start: Vec3, velocity: Vec2, gravity: f32) -> Self {
        Self {
            start,
            velocity,
            gravity,
        }
    }

    pub fn position_at(&self, t: f32) -> Vec3 {
        Vec3::new(
            self.start.x + self.velocity.x * t,
            self.start.y + self.velocity.y * t + 0.5 * self.gravity * t * t,
            self.start.z,
        )
    }

    /// Sample `count` points `time_step` seconds apart.
    ///
    /// The list ends at the first point whose segment from its predecessor
    /// hits geometry in `mask`.
    pub fn sample_points(
        &self,
        world: &CollisionWorld,
        count: usize,
        time_step: f32,
        mask: CollisionLayers,
    ) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(count);

        for i in 0..count {
            let point = self.position_at(i as f32 * time_step);

            if let Some(&previous) = points.last() {
                let segment: Vec3 = point - previous;
                if world
                    .raycast(previous, segment, segment.length(), mask)
                    .hit_something()
                {
                    break;
                }
            }

            points.push(point);
        }

        points
    }
}

/// Cone-shaped pull toward a suction point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeAttraction {
    pub range: f32,
    /// Full opening angle of the cone (degrees).
    pub cone_angle: f32,
    pub max_force: f32,
}

impl ConeAttraction {
    /// Force pulling a body at `body` toward `origin`.
    ///
    /// `None` when the body is out of range or outside the cone around
    /// `axis`. Strength falls off linearly with both distance and angle.
    pub fn force_on(&self, origin: Vec3, axis: Vec3, body: Vec3) -> Option<Vec3> {
        let to_body = body - origin;
        let distance = to_body.length();
        if distance > self.range || self.range <= 0.0 {
            return None;
        }

        let half_cone = self.cone_angle * 0.5;
        let angle = if distance > 1e-6 && axis.length_squared() > 1e-8 {
            axis.angle_between(to_body).to_degrees()
        } else {
            0.0
        };
        if angle > half_cone {
            return None;
        }

        let distance_falloff = (1.0 - distance / self.range).clamp(0.0, 1.0);
        let angle_falloff = if half_cone > 0.0 {
            (1.0 - angle / half_cone).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let pull = (-to_body).normalize_or_zero();
        Some(pull * distance_falloff * angle_falloff * self.max_force)
    }
}
