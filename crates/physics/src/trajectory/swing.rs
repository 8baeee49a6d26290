//! Pendulum swing.
//!
//! While attached to an anchor the actor is treated as a point mass on a
//! rigid rope. Gravity acts only through the angular acceleration
//! `g / L * sin(theta)`, velocity is always re-expressed along the tangent
//! of the rope, and a final constraint clamps the predicted position back
//! onto the rope circle so the rope never stretches.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::movement::SwingAbility;

/// A rope attached to a fixed pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub pivot: Vec3,
    /// Rope length captured at attach time.
    pub rest_length: f32,
}

impl Pendulum {
    /// Ropes shorter than this are rejected.
    pub const MIN_ROPE_LENGTH: f32 = 1e-3;

    /// Attach a rope from `position` to `pivot`.
    pub fn attach(position: Vec3, pivot: Vec3) -> Option<Self> {
        let rest_length = rope(position, pivot).length();
        (rest_length >= Self::MIN_ROPE_LENGTH).then_some(Self { pivot, rest_length })
    }

    /// Unit tangent of the swing circle at `position`.
    ///
    /// Perpendicular to the rope, rotated counter-clockwise.
    pub fn tangent(&self, position: Vec3) -> Option<Vec2> {
        let offset = rope(position, self.pivot);
        let length = offset.length();
        if length < Self::MIN_ROPE_LENGTH {
            return None;
        }
        let direction = offset / length;
        Some(Vec2::new(-direction.y, direction.x))
    }

    /// Angle between the rope and straight down, positive to the right.
    pub fn angle_from_vertical(&self, position: Vec3) -> f32 {
        let offset = rope(position, self.pivot);
        offset.x.atan2(-offset.y)
    }

    /// Keep only the part of `velocity` along the swing tangent.
    pub fn project_to_tangent(&self, position: Vec3, velocity: Vec2) -> Vec2 {
        match self.tangent(position) {
            Some(tangent) => tangent * velocity.dot(tangent),
            None => Vec2::ZERO,
        }
    }

    /// Advance the swing velocity by one tick.
    ///
    /// `gravity` is the signed vertical gravity currently acting on the
    /// actor and `input` the move axis in [-1, 1]. Radial motion is
    /// discarded; damping only bleeds tangential speed.
    pub fn step(
        &self,
        position: Vec3,
        velocity: Vec2,
        gravity: f32,
        input: f32,
        ability: &SwingAbility,
        delta_time: f32,
    ) -> Vec2 {
        let offset = rope(position, self.pivot);
        let length = offset.length();
        let Some(tangent) = self.tangent(position) else {
            return velocity;
        };

        let angle = offset.x.atan2(-offset.y);
        let angular_acceleration = (gravity / length) * angle.sin();
        let angular_velocity = velocity.dot(tangent) / length + angular_acceleration * delta_time;

        let mut tangential = angular_velocity * length;
        tangential += input * ability.user_control_force * delta_time;
        tangential *= (1.0 - ability.damping * delta_time).clamp(0.0, 1.0);

        tangent * tangential
    }

    /// Clamp the velocity so the next position stays within the rope.
    pub fn constrain(&self, position: Vec3, velocity: Vec2, delta_time: f32) -> Vec2 {
        if delta_time <= 0.0 {
            return velocity;
        }

        let current = Vec2::new(position.x, position.y);
        let pivot = Vec2::new(self.pivot.x, self.pivot.y);
        let offset = current + velocity * delta_time - pivot;

        if offset.length() <= self.rest_length {
            return velocity;
        }

        let clamped = pivot + offset.normalize_or_zero() * self.rest_length;
        (clamped - current) / delta_time
    }
}

fn rope(position: Vec3, pivot: Vec3) -> Vec2 {
    Vec2::new(position.x - pivot.x, position.y - pivot.y)
}
