//! Recursive collide-and-slide.
//!
//! Converts a desired displacement into one that respects world geometry.
//! The actor's shape is swept along the displacement; on contact it snaps
//! up to the surface (minus the skin width) and the remainder is projected
//! onto the contact plane and swept again, until the displacement is used
//! up or the recursion limit is reached.
//!
//! Horizontal and vertical motion are resolved in two separate passes. Only
//! the vertical (gravity) pass is allowed to stop dead on a walkable
//! surface; the lateral pass always keeps sliding, which is what lets the
//! actor walk up gentle slopes without being stopped by them.

use glam::Vec3;

use crate::collision::{CollisionLayers, CollisionWorld, TraceResult, TraceShape};

use super::config::PhysicsSettings;
use super::state::KinematicActor;

/// Which half of a step is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePass {
    /// Horizontal movement. Always slides along whatever it hits.
    Lateral,
    /// Vertical movement. Stops on walkable ground.
    Gravity,
}

/// Project `vector` onto the plane with `normal`, keeping its length.
pub fn project_and_scale(vector: Vec3, normal: Vec3) -> Vec3 {
    let magnitude = vector.length();
    let along_plane = vector - normal * vector.dot(normal);
    along_plane.normalize_or_zero() * magnitude
}

/// Movement up to the skin before a hit. Snaps shorter than the skin
/// are dropped so the actor does not jitter against the contact.
fn snap_to_surface(direction: Vec3, hit_distance: f32, skin: f32) -> Vec3 {
    let snap = direction * (hit_distance - skin).max(0.0);
    if snap.length() < skin {
        Vec3::ZERO
    } else {
        snap
    }
}

/// Collide-and-slide displacement resolver.
#[derive(Debug, Clone)]
pub struct CollideAndSlide {
    settings: PhysicsSettings,
    mask: CollisionLayers,
}

impl CollideAndSlide {
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            settings,
            mask: CollisionLayers::MASK_ACTOR_SOLID,
        }
    }

    /// Resolve one displacement against the world.
    ///
    /// # Arguments
    ///
    /// * `world` - Geometry to collide with
    /// * `origin` - Center of the (un-inset) shape before moving
    /// * `shape` - The actor's collision shape; the skin width is inset here
    /// * `displacement` - Desired movement for this pass
    /// * `depth` - Recursion depth, 0 for the first call
    /// * `pass` - Whether walkable surfaces should stop the motion
    /// * `on_hit` - Invoked once for every contact encountered
    ///
    /// # Returns
    ///
    /// The displacement that can actually be applied. Zero once the
    /// recursion limit is reached.
    pub fn resolve<F>(
        &self,
        world: &CollisionWorld,
        origin: Vec3,
        shape: TraceShape,
        displacement: Vec3,
        depth: u32,
        pass: SlidePass,
        on_hit: &mut F,
    ) -> Vec3
    where
        F: FnMut(&TraceResult),
    {
        if depth >= self.settings.max_resolve_depth {
            return Vec3::ZERO;
        }

        let distance = displacement.length();
        if distance < self.settings.resolve_epsilon {
            return displacement;
        }

        let skin = self.settings.skin_width;
        let direction = displacement / distance;
        let cast_shape = shape.inset(skin);
        let hit = world.shape_cast(origin, direction, distance + skin, cast_shape, self.mask);

        let Some(normal) = hit.hit_normal else {
            return displacement;
        };

        on_hit(&hit);

        let snap_to_surface = snap_to_surface(direction, hit.distance, skin);

        let leftover = displacement - snap_to_surface;
        let angle = normal.angle_between(Vec3::Y).to_degrees();

        if angle < self.settings.max_slope_angle && pass == SlidePass::Gravity {
            return snap_to_surface;
        }

        log::trace!(
            "slide depth={} normal={:?} angle={:.1} leftover={:?}",
            depth,
            normal,
            angle,
            leftover
        );

        let slide = project_and_scale(leftover, normal);
        snap_to_surface
            + self.resolve(
                world,
                origin + snap_to_surface,
                shape,
                slide,
                depth + 1,
                pass,
                on_hit,
            )
    }

    /// Move the actor by its velocity for one tick.
    ///
    /// The horizontal pass runs first and is applied before the vertical
    /// pass is cast. Each velocity component is rewritten from its resolved
    /// displacement, so blocked motion loses its speed. The depth axis is
    /// pinned to the actor's plane afterwards.
    pub fn simulate_step<F>(
        &self,
        world: &CollisionWorld,
        actor: &mut KinematicActor,
        shape: TraceShape,
        shape_offset: Vec3,
        delta_time: f32,
        on_hit: &mut F,
    ) where
        F: FnMut(&TraceResult),
    {
        if delta_time <= 0.0 {
            return;
        }

        let horizontal = Vec3::new(actor.velocity.x, 0.0, 0.0) * delta_time;
        let horizontal = self.resolve(
            world,
            actor.position + shape_offset,
            shape,
            horizontal,
            0,
            SlidePass::Lateral,
            on_hit,
        );
        actor.velocity.x = horizontal.x / delta_time;
        actor.position += horizontal;

        let vertical = Vec3::new(0.0, actor.velocity.y, 0.0) * delta_time;
        let vertical = self.resolve(
            world,
            actor.position + shape_offset,
            shape,
            vertical,
            0,
            SlidePass::Gravity,
            on_hit,
        );
        actor.velocity.y = vertical.y / delta_time;
        actor.position += vertical;

        actor.position.z = actor.plane_z;
    }
}

// ============================================================================
// Tests
// ============================================================================
