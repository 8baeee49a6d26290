//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::CollisionLayers;
use super::world::BrushId;

/// Result of a collision query through the world.
///
/// Casts sweep a shape from an origin along a direction and report the
/// first thing hit along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the cast we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at the origin
    pub fraction: f32,

    /// Distance traveled before the hit, in meters.
    ///
    /// Equal to the requested maximum when nothing was hit.
    pub distance: f32,

    /// Position of the shape's origin at the moment of impact.
    pub end_position: Vec3,

    /// Contact point on the surface that was hit.
    pub hit_point: Option<Vec3>,

    /// Surface normal at the impact point.
    ///
    /// Points away from the surface that was hit. `None` if nothing was hit.
    pub hit_normal: Option<Vec3>,

    /// Layers of the brush that was hit.
    pub hit_layers: CollisionLayers,

    /// The brush that was hit, if any.
    pub hit_brush: Option<BrushId>,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO, 0.0)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3, distance: f32) -> Self {
        Self {
            fraction: 1.0,
            distance,
            end_position,
            hit_point: None,
            hit_normal: None,
            hit_layers: CollisionLayers::EMPTY,
            hit_brush: None,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.hit_normal.is_some()
    }

    /// Get the hit normal, defaulting to up if none.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape used for collision casts.
///
/// All shapes are centered on the cast origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the end caps.
        radius: f32,
        /// Half the distance between the two cap centers.
        half_segment: f32,
    },

    /// A sphere, used by the transformed ball body.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },

    /// An axis-aligned box.
    Box {
        /// Half-size in each axis (x, y, z).
        half_extents: Vec3,
    },

    /// A single point. Casting a point is a raycast.
    Point,
}

impl TraceShape {
    /// Shrink the shape uniformly by `amount`, never below zero.
    ///
    /// Movement casts use the shape inset by the skin width.
    pub fn inset(self, amount: f32) -> Self {
        match self {
            Self::Capsule {
                radius,
                half_segment,
            } => Self::Capsule {
                radius: (radius - amount).max(0.0),
                half_segment,
            },
            Self::Sphere { radius } => Self::Sphere {
                radius: (radius - amount).max(0.0),
            },
            Self::Box { half_extents } => Self::Box {
                half_extents: (half_extents - Vec3::splat(amount)).max(Vec3::ZERO),
            },
            Self::Point => Self::Point,
        }
    }

    /// Check if this is a point trace (raycast).
    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point)
    }
}
