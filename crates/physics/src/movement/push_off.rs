//! Overhang push-off.
//!
//! When the actor jumps up with one shoulder under a ledge, four short
//! upward rays find out which side is blocked and nudge the actor out from
//! under it instead of letting the jump die on the corner.

use glam::Vec3;

use crate::collision::{CollisionLayers, CollisionWorld};

use super::config::PushOffRays;

/// Four-ray ceiling clearance check.
#[derive(Debug, Clone)]
pub struct OverhangPushOff {
    rays: PushOffRays,
    skin_width: f32,
    mask: CollisionLayers,
}

impl OverhangPushOff {
    pub fn new(rays: PushOffRays, skin_width: f32) -> Self {
        Self {
            rays,
            skin_width,
            mask: CollisionLayers::MASK_ACTOR_SOLID,
        }
    }

    /// Lateral nudge needed to clear an overhang, if any.
    ///
    /// Only checks while moving up. Returns `-push_distance` when only the
    /// right outer ray is blocked and `+push_distance` when only the left
    /// outer ray is blocked.
    pub fn push_off(
        &self,
        world: &CollisionWorld,
        position: Vec3,
        vertical_velocity: f32,
        delta_time: f32,
    ) -> Option<f32> {
        let vertical_move = vertical_velocity * delta_time;
        if vertical_move <= 0.0 {
            return None;
        }

        let origin = position + Vec3::new(0.0, self.rays.cast_height - self.skin_width, 0.0);
        let distance = vertical_move.abs() + self.skin_width;
        let blocked = |lateral: f32| {
            world
                .raycast(origin + Vec3::new(lateral, 0.0, 0.0), Vec3::Y, distance, self.mask)
                .hit_something()
        };

        let left_outer = blocked(-self.rays.outer_offset);
        let left_inner = blocked(-self.rays.inner_offset);
        let right_inner = blocked(self.rays.inner_offset);
        let right_outer = blocked(self.rays.outer_offset);

        if right_outer && !right_inner && !left_inner && !left_outer {
            Some(-self.rays.push_distance)
        } else if left_outer && !left_inner && !right_inner && !right_outer {
            Some(self.rays.push_distance)
        } else {
            None
        }
    }
}
