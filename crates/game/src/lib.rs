//! Lilypad Game Logic
//!
//! This crate wraps the movement engine in a playable session:
//!
//! - Input routing with press/release edges and input freezing
//! - Traversal abilities (grapple, swing, suction/throw, transform)
//! - The tongue used to aim and attach those abilities
//! - Dynamic throwable bodies
//! - Levels with wind zones and impulse pads
//! - Configuration loading from RON
//!
//! # Architecture
//!
//! The game is a deterministic fixed-tick simulation. A single
//! [`Simulation`] owns every piece of state and is advanced by one
//! [`PlayerInput`] per tick.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Simulation                              │
//! │  ┌─────────┐   ┌───────────┐   ┌──────────┐   ┌───────────────┐  │
//! │  │ Input   │──►│ Abilities │──►│ Physics  │──►│ Bodies, level │  │
//! │  │ router  │   │ + tongue  │   │ (movement│   │ timers        │  │
//! │  └─────────┘   └───────────┘   │ collision)   └───────────────┘  │
//! │                                └──────────┘                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod abilities;
pub mod bodies;
pub mod config;
pub mod input;
pub mod level;
pub mod simulation;
pub mod tongue;

// Re-export main types
pub use abilities::{AbilityId, AbilityUser};
pub use bodies::{BodyHandle, BodySet, DynamicBody, Throwable};
pub use config::{AbilityConfig, ConfigError, SimulationConfig, SuctionAbility, TransformAbility};
pub use input::{AbilityButtons, InputRouter, PlayerInput};
pub use level::Level;
pub use simulation::Simulation;
pub use tongue::{Tongue, TongueMode};

// Re-export physics types for convenience
pub use lilypad_physics::{
    CollisionLayers, CollisionWorld, MovementConfig, MovementState, PlayerCommand,
    PlayerController, StateTag, TickReport, TraceResult, TraceShape,
};
