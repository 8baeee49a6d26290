//! Character movement.
//!
//! This module implements 2.5D platformer movement with:
//!
//! - Recursive collide-and-slide against arbitrary geometry
//! - Gravity derived from designer-facing jump height and distance
//! - Jump buffering and coyote time
//! - A locomotion state machine (grounded, falling, jumping, grappling,
//!   swinging)
//! - Overhang push-off
//!
//! # Design
//!
//! Movement is driven by the [`PlayerController`], which takes a
//! [`PlayerCommand`] each fixed tick and advances the actor's
//! [`MovementState`] through the collision world.

mod buffer;
mod config;
mod controller;
mod gravity;
mod ground;
pub mod locomotion;
mod push_off;
mod resolver;
mod state;

pub use buffer::InputBuffer;
pub use config::{
    ActorShape, GrappleAbility, GroundCheck, JumpAction, MoveAction, MovementConfig,
    PhysicsSettings, PushOffRays, SwingAbility, TimeSettings,
};
pub use controller::{PlayerController, TickReport};
pub use gravity::{ActionSet, GravityModel};
pub use ground::{GroundContact, GroundDetector};
pub use locomotion::{
    CollisionNotice, GrappleRequest, LocomotionEvent, LocomotionState, LocomotionStateMachine,
    StateTag, SwingRequest, TransformChange, Transition,
};
pub use push_off::OverhangPushOff;
pub use resolver::{project_and_scale, CollideAndSlide, SlidePass};
pub use state::{BodyForm, KinematicActor, MovementState, PlayerCommand};
