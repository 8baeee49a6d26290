//! Dynamic bodies.
//!
//! Loose objects in the level that abilities can push around: point masses
//! with a sphere for collision, integrated under world gravity and stopped
//! against level geometry. There is no rotation and bodies do not collide
//! with each other.

use glam::Vec3;
use lilypad_physics::{CollisionLayers, CollisionWorld, TraceShape};
use serde::{Deserialize, Serialize};

/// Identifier of a body in a [`BodySet`].
pub type BodyId = u32;

/// Gap kept between a body and the surface it stops against.
const CONTACT_SKIN: f32 = 0.01;

/// Force-bearing body as seen by abilities.
pub trait BodyHandle {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn uses_gravity(&self) -> bool;
    fn set_use_gravity(&mut self, enabled: bool);

    /// Instantaneous velocity change, independent of mass.
    fn apply_velocity_change(&mut self, delta: Vec3) {
        let velocity = self.velocity();
        self.set_velocity(velocity + delta);
    }

    /// Teleport on the next step, ignoring geometry.
    fn move_kinematic(&mut self, target: Vec3);
}

/// How a body behaves when thrown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Throwable {
    /// Apex of a straight-up throw at full charge (meters).
    pub max_vertical_height: f32,

    /// Seconds of holding needed for a full-charge throw.
    pub max_hold_time: f32,
}

impl Default for Throwable {
    fn default() -> Self {
        Self {
            max_vertical_height: 10.0,
            max_hold_time: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicBody {
    pub id: BodyId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub use_gravity: bool,
    pub radius: f32,

    /// Present on bodies the suction ability can throw.
    pub throwable: Option<Throwable>,

    kinematic_target: Option<Vec3>,
}

impl DynamicBody {
    pub fn new(id: BodyId, position: Vec3, radius: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            use_gravity: true,
            radius,
            throwable: None,
            kinematic_target: None,
        }
    }

    /// Accelerate a unit-mass body for `delta_time`.
    pub fn apply_force(&mut self, force: Vec3, delta_time: f32) {
        self.velocity += force * delta_time;
    }

    pub fn is_throwable(&self) -> bool {
        self.throwable.is_some()
    }
}

impl BodyHandle for DynamicBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn uses_gravity(&self) -> bool {
        self.use_gravity
    }

    fn set_use_gravity(&mut self, enabled: bool) {
        self.use_gravity = enabled;
    }

    fn move_kinematic(&mut self, target: Vec3) {
        self.kinematic_target = Some(target);
    }
}

/// Every dynamic body in the level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodySet {
    bodies: Vec<DynamicBody>,
    next_id: BodyId,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: Vec3, radius: f32, throwable: Option<Throwable>) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;

        let mut body = DynamicBody::new(id, position, radius);
        body.throwable = throwable;
        self.bodies.push(body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&DynamicBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut DynamicBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DynamicBody> {
        self.bodies.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Integrate every body for one tick.
    ///
    /// Pending kinematic moves are applied as-is. Everything else falls
    /// under `gravity` (when enabled) and is swept as a sphere; on contact
    /// the body stops at the surface and loses the velocity component
    /// going into it.
    pub fn step(&mut self, world: &CollisionWorld, gravity: f32, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        for body in &mut self.bodies {
            if let Some(target) = body.kinematic_target.take() {
                body.position = target;
                continue;
            }

            if body.use_gravity {
                body.velocity.y += gravity * delta_time;
            }

            let displacement = body.velocity * delta_time;
            let distance = displacement.length();
            if distance < 1e-6 {
                continue;
            }

            let direction = displacement / distance;
            let hit = world.shape_cast(
                body.position,
                direction,
                distance,
                TraceShape::Sphere { radius: body.radius },
                CollisionLayers::MASK_ACTOR_SOLID,
            );

            match hit.hit_normal {
                Some(normal) => {
                    body.position += direction * (hit.distance - CONTACT_SKIN).max(0.0);
                    let into_surface = body.velocity.dot(normal).min(0.0);
                    body.velocity -= normal * into_surface;
                }
                None => body.position += displacement,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 5.0),
            CollisionLayers::WORLD,
        );
        world
    }

    #[test]
    fn test_body_falls_and_rests_on_floor() {
        let world = create_test_world();
        let mut bodies = BodySet::new();
        let id = bodies.add(Vec3::new(0.0, 3.0, 0.0), 0.25, None);

        for _ in 0..150 {
            bodies.step(&world, -9.81, 0.02);
        }

        let body = bodies.get(id).unwrap();
        assert!(
            (body.position.y - 0.25).abs() < 0.05,
            "Should rest on floor, y={}",
            body.position.y
        );
        assert!(body.velocity.y.abs() < 0.5, "vy={}", body.velocity.y);
    }

    #[test]
    fn test_gravity_flag_freezes_body() {
        let world = create_test_world();
        let mut bodies = BodySet::new();
        let id = bodies.add(Vec3::new(0.0, 3.0, 0.0), 0.25, None);
        bodies.get_mut(id).unwrap().set_use_gravity(false);

        for _ in 0..10 {
            bodies.step(&world, -9.81, 0.02);
        }

        assert_eq!(bodies.get(id).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_kinematic_move_ignores_velocity() {
        let world = create_test_world();
        let mut bodies = BodySet::new();
        let id = bodies.add(Vec3::new(0.0, 3.0, 0.0), 0.25, Some(Throwable::default()));

        let body = bodies.get_mut(id).unwrap();
        body.apply_velocity_change(Vec3::new(5.0, 0.0, 0.0));
        body.move_kinematic(Vec3::new(-2.0, 4.0, 0.0));
        bodies.step(&world, -9.81, 0.02);

        let body = bodies.get(id).unwrap();
        assert_eq!(body.position, Vec3::new(-2.0, 4.0, 0.0));
        assert!(body.is_throwable());
    }
}
