//! Collision world containing all static level geometry.
//!
//! The collision world stores all collidable geometry and answers the
//! spatial queries the movement code needs: shape casts, raycasts and
//! sphere overlaps, each filtered by a layer mask.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, ShapeCastOptions};
use parry3d::shape::SharedShape;

use super::flags::CollisionLayers;
use super::trace::{TraceResult, TraceShape};

/// Identifier of a brush in the collision world.
pub type BrushId = u32;

/// Directions shorter than this are treated as no direction at all.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: BrushId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Layers used for query filtering.
    pub layers: CollisionLayers,
}

/// The collision world containing all geometry.
///
/// Level geometry is built from boxes, axis-aligned or rotated about the
/// depth axis for ramps.
///
/// The world is immutable during a tick and can be shared by reference with
/// every component that queries it.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    /// Static world brushes (walls, floors, anchors, etc.).
    brushes: Vec<CollisionBrush>,
    /// Next brush ID to assign.
    next_id: BrushId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `layers` - Layers for query filtering
    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        layers: CollisionLayers,
    ) -> BrushId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push_brush(shape, transform, layers)
    }

    /// Add a box rotated about the depth (z) axis.
    ///
    /// Used for ramps and slopes in the lateral plane.
    pub fn add_rotated_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        angle_radians: f32,
        layers: CollisionLayers,
    ) -> BrushId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(0.0, 0.0, angle_radians),
        );
        self.push_brush(shape, transform, layers)
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep a shape through the world.
    ///
    /// This is the primary collision query. It casts `shape`, centered on
    /// `origin`, along `direction` for up to `max_distance` and returns the
    /// closest hit among brushes whose layers intersect `mask`.
    pub fn shape_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        shape: TraceShape,
        mask: CollisionLayers,
    ) -> TraceResult {
        if shape.is_point() {
            return self.raycast(origin, direction, max_distance, mask);
        }

        let dir = direction.normalize_or_zero();
        if dir.length_squared() < MIN_DIRECTION_LENGTH || max_distance <= 0.0 {
            return TraceResult::no_hit(origin, 0.0);
        }

        let cast_shape = Self::create_parry_shape(shape);
        let cast_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let cast_vel = Vector::new(dir.x, dir.y, dir.z);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let mut closest: Option<(f32, Vec3, Vec3, &CollisionBrush)> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }

            let hit = match query::cast_shapes(
                &cast_pos,
                &cast_vel,
                cast_shape.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) {
                Ok(Some(hit)) => hit,
                Ok(None) => continue,
                Err(_) => {
                    log::warn!("shape cast unsupported against brush {}", brush.id);
                    continue;
                }
            };

            let is_closer = closest
                .as_ref()
                .map_or(true, |(toi, ..)| hit.time_of_impact < *toi);
            if !is_closer {
                continue;
            }

            // Impact geometry is reported in the brush's local frame
            let normal = brush.transform.rotation * hit.normal2.into_inner();
            let point = brush.transform * hit.witness2;

            closest = Some((
                hit.time_of_impact,
                Vec3::new(point.x, point.y, point.z),
                Vec3::new(normal.x, normal.y, normal.z).normalize_or(-dir),
                brush,
            ));
        }

        match closest {
            Some((distance, point, normal, brush)) => TraceResult {
                fraction: distance / max_distance,
                distance,
                end_position: origin + dir * distance,
                hit_point: Some(point),
                hit_normal: Some(normal),
                hit_layers: brush.layers,
                hit_brush: Some(brush.id),
            },
            None => TraceResult::no_hit(origin + dir * max_distance, max_distance),
        }
    }

    /// Perform a raycast (point trace) through the world.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    /// * `max_distance` - Maximum trace distance
    /// * `mask` - Layers to collide with
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < MIN_DIRECTION_LENGTH || max_distance <= 0.0 {
            return TraceResult::no_hit(origin, 0.0);
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest_hit: Option<(f32, Vec3, &CollisionBrush)> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }

            if let Some(intersection) =
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            {
                let toi = intersection.time_of_impact;
                let is_closer = closest_hit
                    .as_ref()
                    .map_or(true, |(dist, _, _)| toi < *dist);

                if is_closer {
                    let n = intersection.normal;
                    let normal = Vec3::new(n.x, n.y, n.z).normalize_or(-dir);
                    closest_hit = Some((toi, normal, brush));
                }
            }
        }

        if let Some((distance, normal, brush)) = closest_hit {
            let hit_point = origin + dir * distance;
            TraceResult {
                fraction: distance / max_distance,
                distance,
                end_position: hit_point,
                hit_point: Some(hit_point),
                hit_normal: Some(normal),
                hit_layers: brush.layers,
                hit_brush: Some(brush.id),
            }
        } else {
            TraceResult::no_hit(origin + dir * max_distance, max_distance)
        }
    }

    /// Collect every brush overlapping a sphere.
    pub fn overlap_sphere(&self, center: Vec3, radius: f32, mask: CollisionLayers) -> Vec<BrushId> {
        let ball = SharedShape::ball(radius.max(0.0));
        let pos = Isometry::translation(center.x, center.y, center.z);

        self.brushes
            .iter()
            .filter(|brush| mask.intersects(brush.layers))
            .filter(|brush| {
                let test = query::intersection_test(
                    &pos,
                    ball.as_ref(),
                    &brush.transform,
                    brush.shape.as_ref(),
                );
                matches!(test, Ok(true))
            })
            .map(|brush| brush.id)
            .collect()
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        layers: CollisionLayers,
    ) -> BrushId {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layers,
        });

        id
    }

    /// Create a parry3d shape from our TraceShape.
    fn create_parry_shape(shape: TraceShape) -> SharedShape {
        match shape {
            TraceShape::Capsule {
                radius,
                half_segment,
            } => SharedShape::capsule_y(half_segment, radius),
            TraceShape::Sphere { radius } => SharedShape::ball(radius),
            TraceShape::Box { half_extents } => {
                SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            // Use a tiny sphere for point queries
            TraceShape::Point => SharedShape::ball(0.001),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 5.0),
            CollisionLayers::WORLD,
        );

        // Wall at x=10
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 5.0),
            CollisionLayers::WORLD,
        );

        world
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let origin = Vec3::new(0.0, 1.0, 0.0);
        let result = world.raycast(origin, Vec3::X, 100.0, CollisionLayers::WORLD);

        assert!(result.hit_something());
        assert!(result.fraction < 1.0);
        // Should hit wall at approximately x=9.5
        assert!((result.end_position.x - 9.5).abs() < 0.01);
        assert!((result.normal_or_up() - (-Vec3::X)).length() < 0.01);
        assert_eq!(result.hit_brush, Some(1));
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        let origin = Vec3::new(0.0, 1.0, 0.0);
        let result = world.raycast(origin, -Vec3::X, 100.0, CollisionLayers::WORLD);

        assert!(!result.hit_something());
        assert_eq!(result.fraction, 1.0);
        assert_eq!(result.distance, 100.0);
    }

    #[test]
    fn test_capsule_cast_stops_before_wall() {
        let world = create_test_world();
        let shape = TraceShape::Capsule {
            radius: 0.5,
            half_segment: 0.5,
        };

        let origin = Vec3::new(0.0, 1.5, 0.0);
        let result = world.shape_cast(origin, Vec3::X, 20.0, shape, CollisionLayers::WORLD);

        assert!(result.hit_something());
        // Capsule surface reaches the wall face at x=9.5
        assert!((result.distance - 9.0).abs() < 0.01, "distance={}", result.distance);
        assert!(result.normal_or_up().x < -0.99);
    }

    #[test]
    fn test_box_cast_down_finds_floor() {
        let world = create_test_world();
        let shape = TraceShape::Box {
            half_extents: Vec3::new(0.4, 0.1, 0.4),
        };

        let origin = Vec3::new(0.0, 0.5, 0.0);
        let result = world.shape_cast(origin, -Vec3::Y, 0.5, shape, CollisionLayers::WORLD);

        assert!(result.hit_something());
        assert!((result.distance - 0.4).abs() < 0.01);
        assert!(result.normal_or_up().y > 0.99);
    }

    #[test]
    fn test_overlap_sphere() {
        let world = create_test_world();

        let hits = world.overlap_sphere(Vec3::new(9.0, 1.5, 0.0), 1.0, CollisionLayers::WORLD);
        assert_eq!(hits, vec![1]);

        let hits = world.overlap_sphere(Vec3::new(0.0, 3.0, 0.0), 1.0, CollisionLayers::WORLD);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_layer_mask_filtering() {
        let mut world = CollisionWorld::new();

        world.add_box(Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 5.0), CollisionLayers::WORLD);
        world.add_box(Vec3::new(3.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 5.0), CollisionLayers::TRIGGER);

        // Raycast with the WORLD mask should ignore the trigger
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let result = world.raycast(origin, Vec3::X, 100.0, CollisionLayers::WORLD);

        assert!(result.hit_something());
        assert!((result.end_position.x - 4.5).abs() < 0.01);
        assert_eq!(result.hit_layers, CollisionLayers::WORLD);
    }
}
