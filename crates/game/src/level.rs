//! Level loading and management.

use glam::Vec3;
use lilypad_physics::forces::ForceSourceId;
use lilypad_physics::{
    CollisionLayers, CollisionWorld, ExternalForceAggregator, ForceSource, Wind, WindSettings,
};
use serde::{Deserialize, Serialize};

use crate::bodies::Throwable;

/// A game level containing collision geometry, spawn points and force
/// volumes.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Wind zones and impulse pads.
    pub force_volumes: Vec<ForceVolume>,

    /// Loose objects placed at load time.
    pub throwables: Vec<ThrowableSpawn>,

    next_volume_id: ForceSourceId,
}

/// A spawn point for the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing along the lateral axis (+1 right, -1 left).
    pub facing: f32,
}

/// A throwable body placed in the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowableSpawn {
    pub position: Vec3,
    pub radius: f32,
    pub throwable: Throwable,
}

/// What a force volume does to the actor inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VolumeForce {
    /// Pushes for as long as the actor stays inside.
    Wind(Wind),
    /// Pushes once per entry.
    Impulse(Vec3),
}

/// Trigger box that registers a force source on the actor while it is
/// inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceVolume {
    pub id: ForceSourceId,

    /// Center position.
    pub position: Vec3,

    /// Half-extents of the trigger box.
    pub half_extents: Vec3,

    pub force: VolumeForce,

    /// Whether the actor was inside last tick.
    pub occupied: bool,
}

impl ForceVolume {
    pub fn contains(&self, point: Vec3) -> bool {
        let min = self.position - self.half_extents;
        let max = self.position + self.half_extents;
        point.cmpge(min).all() && point.cmple(max).all()
    }
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            force_volumes: Vec::new(),
            throwables: Vec::new(),
            next_volume_id: 1,
        }
    }

    /// Create a small course exercising every traversal ability.
    ///
    /// ```text
    ///         swing                grapple
    ///           ■                    ▬▬▬        ~~~wind~~~
    ///                                            ~~~~~~~~~~
    ///  ▌     ↑pad       o    @              o
    ///  ▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀
    /// ```
    pub fn test_course() -> Self {
        let mut level = Self::new("test_course", "Test Course");

        // Floor, top at y=0
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(60.0, 0.5, 5.0),
            CollisionLayers::WORLD,
        );

        // Back wall
        level.collision.add_box(
            Vec3::new(-30.5, 10.0, 0.0),
            Vec3::new(0.5, 10.0, 5.0),
            CollisionLayers::WORLD,
        );

        // Grapple ledge, underside at y=4.5
        level.collision.add_box(
            Vec3::new(6.0, 5.0, 0.0),
            Vec3::new(1.5, 0.5, 2.0),
            CollisionLayers::GRAPPLE,
        );

        // Swing anchor, underside at y=6.5
        level.collision.add_box(
            Vec3::new(-6.0, 7.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::SWING,
        );

        level.add_wind_volume(
            Vec3::new(25.0, 3.0, 0.0),
            Vec3::new(5.0, 3.0, 5.0),
            WindSettings::default(),
        );
        level.add_impulse_volume(
            Vec3::new(-15.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 5.0),
            Vec3::new(0.0, 400.0, 0.0),
        );

        level.throwables.push(ThrowableSpawn {
            position: Vec3::new(3.0, 0.3, 0.0),
            radius: 0.25,
            throwable: Throwable::default(),
        });
        level.throwables.push(ThrowableSpawn {
            position: Vec3::new(12.0, 0.3, 0.0),
            radius: 0.25,
            throwable: Throwable::default(),
        });

        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(0.0, 1.0, 0.0),
            facing: 1.0,
        });

        level
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    pub fn add_wind_volume(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        settings: WindSettings,
    ) -> ForceSourceId {
        self.add_force_volume(position, half_extents, VolumeForce::Wind(Wind::new(settings)))
    }

    pub fn add_impulse_volume(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        impulse: Vec3,
    ) -> ForceSourceId {
        self.add_force_volume(position, half_extents, VolumeForce::Impulse(impulse))
    }

    fn add_force_volume(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        force: VolumeForce,
    ) -> ForceSourceId {
        let id = self.next_volume_id;
        self.next_volume_id += 1;
        self.force_volumes.push(ForceVolume {
            id,
            position,
            half_extents,
            force,
            occupied: false,
        });
        id
    }

    /// Register or unregister force volumes as the actor enters or
    /// leaves them.
    pub fn update_force_volumes(&mut self, position: Vec3, forces: &mut ExternalForceAggregator) {
        for volume in &mut self.force_volumes {
            let inside = volume.contains(position);

            if inside && !volume.occupied {
                let source = match volume.force {
                    VolumeForce::Wind(wind) => ForceSource::Wind(wind),
                    VolumeForce::Impulse(impulse) => ForceSource::Impulse(impulse),
                };
                forces.register(volume.id, source);
                log::debug!("entered force volume {}", volume.id);
            } else if !inside && volume.occupied {
                forces.unregister(volume.id);
                log::debug!("left force volume {}", volume.id);
            }

            volume.occupied = inside;
        }
    }

    /// Advance wind duty cycles so a fresh entry picks up the current
    /// phase.
    pub fn advance(&mut self, delta_time: f32) {
        for volume in &mut self.force_volumes {
            if let VolumeForce::Wind(wind) = &mut volume.force {
                wind.advance(delta_time);
            }
        }
    }
}
