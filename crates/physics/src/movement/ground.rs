//! Ground detection.
//!
//! A single downward box cast from just below the actor's center decides
//! whether it is standing on something. The previous tick's answer is kept
//! so landings and ledge departures can be detected as edges.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionLayers, CollisionWorld, TraceShape};

use super::config::GroundCheck;

/// Grounded state for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundContact {
    /// Standing on something this tick.
    pub is_grounded: bool,
    /// Standing on something last tick.
    pub was_grounded: bool,
    /// Became grounded this tick.
    pub just_landed: bool,
}

impl GroundContact {
    /// Left the ground this tick.
    #[inline]
    pub fn just_left(&self) -> bool {
        self.was_grounded && !self.is_grounded
    }
}

/// Downward box cast producing a [`GroundContact`] every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundDetector {
    check: GroundCheck,
    contact: GroundContact,
    ground_normal: Option<Vec3>,
}

impl GroundDetector {
    pub fn new(check: GroundCheck) -> Self {
        Self {
            check,
            contact: GroundContact::default(),
            ground_normal: None,
        }
    }

    /// Re-check the ground beneath `position`.
    ///
    /// Call exactly once per tick, before anything reads the contact.
    pub fn refresh(&mut self, world: &CollisionWorld, position: Vec3) {
        let was_grounded = self.contact.is_grounded;

        let cast_position = position + Vec3::new(0.0, self.check.vertical_offset, 0.0);
        let shape = TraceShape::Box {
            half_extents: self.check.half_extents,
        };
        let trace = world.shape_cast(
            cast_position,
            -Vec3::Y,
            self.check.check_length,
            shape,
            CollisionLayers::MASK_ACTOR_SOLID,
        );

        let is_grounded = trace.hit_something();
        self.ground_normal = trace.hit_normal;
        self.contact = GroundContact {
            is_grounded,
            was_grounded,
            just_landed: is_grounded && !was_grounded,
        };
    }

    /// The contact computed by the last refresh.
    #[inline]
    pub fn contact(&self) -> GroundContact {
        self.contact
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.contact.is_grounded
    }

    /// Normal of the surface under the actor, if grounded.
    pub fn ground_normal(&self) -> Option<Vec3> {
        self.ground_normal
    }
}
