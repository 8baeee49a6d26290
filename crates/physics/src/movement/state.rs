//! Movement state and input structures.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::forces::ExternalForceAggregator;

use super::buffer::InputBuffer;
use super::gravity::ActionSet;
use super::ground::GroundDetector;
use super::locomotion::{LocomotionEvent, LocomotionStateMachine, StateTag};

/// Which body the actor currently has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyForm {
    /// Upright capsule.
    #[default]
    Base,
    /// Rolled into a ball.
    Transformed,
}

/// Kinematic body moved by the locomotion states.
///
/// Motion is planar: velocity lives in the XY plane and the position's Z is
/// pinned to `plane_z` after every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicActor {
    /// Body center in world space.
    pub position: Vec3,

    /// Planar velocity (meters/second).
    pub velocity: Vec2,

    /// Vertical gravity currently applied (negative is down).
    pub gravity: f32,

    pub form: BodyForm,

    /// Depth the actor is locked to.
    pub plane_z: f32,
}

impl KinematicActor {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity: 0.0,
            form: BodyForm::Base,
            plane_z: position.z,
        }
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.x.abs()
    }

    /// Check if moving (has significant velocity).
    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 0.01
    }
}

/// Input command from the player for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Horizontal move axis (-1.0 to 1.0). Positive is right.
    pub move_axis: f32,

    /// Jump went down this tick.
    pub jump_pressed: bool,

    /// Jump is down.
    pub jump_held: bool,

    /// Jump went up this tick.
    pub jump_released: bool,
}

impl PlayerCommand {
    /// Command with only a move axis.
    pub fn moving(move_axis: f32) -> Self {
        Self {
            move_axis,
            ..Default::default()
        }
    }

    /// Command that presses jump this tick.
    pub fn jump(move_axis: f32) -> Self {
        Self {
            move_axis,
            jump_pressed: true,
            jump_held: true,
            jump_released: false,
        }
    }

    /// Check if any movement input is active.
    #[inline]
    pub fn has_movement_input(&self, threshold: f32) -> bool {
        self.move_axis.abs() > threshold
    }
}

/// Complete movement state for one actor.
///
/// Created by [`PlayerController::spawn`](super::PlayerController::spawn)
/// and advanced by [`PlayerController::update`](super::PlayerController::update).
#[derive(Debug, Clone)]
pub struct MovementState {
    pub actor: KinematicActor,
    pub ground: GroundDetector,
    pub input: InputBuffer,
    pub forces: ExternalForceAggregator,

    /// Move axis from the latest command, clamped to [-1, 1].
    pub move_axis: f32,

    /// Action set for the current body form.
    pub actions: ActionSet,

    pub(crate) locomotion: LocomotionStateMachine,
    pub(crate) events: VecDeque<LocomotionEvent>,
}

impl MovementState {
    pub fn position(&self) -> Vec3 {
        self.actor.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.actor.velocity
    }

    pub fn state_tag(&self) -> StateTag {
        self.locomotion.tag()
    }

    pub fn locomotion(&self) -> &LocomotionStateMachine {
        &self.locomotion
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.is_grounded()
    }

    /// Queue an event for the next transition step.
    pub fn push_event(&mut self, event: LocomotionEvent) {
        self.events.push_back(event);
    }

    /// Events waiting for the next transition step.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}
