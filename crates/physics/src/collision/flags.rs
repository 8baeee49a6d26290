//! Collision layers for query filtering.
//!
//! Every brush in the world carries a set of layers, and every query carries
//! a mask. A brush is considered by a query when the two intersect.

use serde::{Deserialize, Serialize};

/// Layer bits describing what a piece of geometry is.
///
/// Used to filter collision queries - the actor's movement casts ignore
/// throwables and trigger volumes, grapple targeting only sees grapple
/// points, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    /// Nothing.
    pub const EMPTY: Self = Self(0);

    /// Solid level geometry - floors, walls, ceilings.
    pub const WORLD: Self = Self(1 << 0);

    /// Surfaces the tongue can grapple to.
    pub const GRAPPLE: Self = Self(1 << 1);

    /// Anchors the tongue can swing from.
    pub const SWING: Self = Self(1 << 2);

    /// Dynamic bodies that can be sucked up and thrown.
    pub const THROWABLE: Self = Self(1 << 3);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 5);

    /// Everything the actor's body collides with.
    pub const MASK_ACTOR_SOLID: Self = Self(Self::WORLD.0 | Self::GRAPPLE.0 | Self::SWING.0);

    /// Geometry that blocks the tongue and thrown objects.
    pub const MASK_OBSTRUCTION: Self = Self(Self::WORLD.0 | Self::GRAPPLE.0 | Self::SWING.0);

    /// Check if these layers contain all of the given layers.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given layers are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for CollisionLayers {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_operations() {
        let combined = CollisionLayers::WORLD | CollisionLayers::GRAPPLE;

        assert!(combined.contains(CollisionLayers::WORLD));
        assert!(combined.contains(CollisionLayers::GRAPPLE));
        assert!(!combined.contains(CollisionLayers::SWING));
        assert!(combined.intersects(CollisionLayers::GRAPPLE | CollisionLayers::TRIGGER));
        assert_eq!(combined & CollisionLayers::GRAPPLE, CollisionLayers::GRAPPLE);
    }

    #[test]
    fn test_actor_mask() {
        let mask = CollisionLayers::MASK_ACTOR_SOLID;
        assert!(mask.contains(CollisionLayers::WORLD));
        assert!(mask.contains(CollisionLayers::SWING));
        assert!(!mask.intersects(CollisionLayers::THROWABLE));
        assert!(!mask.intersects(CollisionLayers::TRIGGER));
    }
}
