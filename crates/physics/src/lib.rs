//! Lilypad Physics Engine
//!
//! A deterministic fixed-tick character movement engine for 2.5D
//! platformers. The actor moves through a full 3D collision world while its
//! motion is locked to a single lateral plane.
//!
//! # Architecture
//!
//! - **Collision**: Sweeps capsules, spheres, boxes and rays through the
//!   world and returns hit information
//! - **Movement**: Uses collision sweeps to implement collide-and-slide,
//!   ground detection and the locomotion state machine
//! - **Trajectory**: Closed-form grapple, swing and throw solvers
//! - **Forces**: Wind and impulse sources weighted per locomotion state
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **Designer-facing tuning**: Jump height and distance in, gravity out
//! 3. **Local recovery**: Bad targets and degenerate geometry never abort a tick

pub mod collision;
pub mod error;
pub mod forces;
pub mod movement;
pub mod trajectory;

// Re-export commonly used types
pub use collision::{CollisionLayers, CollisionWorld, TraceResult, TraceShape};
pub use error::PhysicsError;
pub use forces::{ExternalForceAggregator, ForceSource, StateMultipliers, Wind, WindSettings};
pub use movement::{
    ActionSet, BodyForm, GravityModel, LocomotionEvent, MovementConfig, MovementState,
    PlayerCommand, PlayerController, StateTag, TickReport,
};
pub use trajectory::{ConeAttraction, GrappleArc, Pendulum, ThrowArc};
