//! Collision queries for kinematic movement.
//!
//! This module provides the spatial query backend the movement code is built
//! on. Geometry lives in a [`CollisionWorld`] as parry3d shapes, and every
//! query is filtered by [`CollisionLayers`].
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The collision environment containing all geometry
//! - [`TraceResult`]: Output from a cast or raycast
//! - [`TraceShape`]: Shape used for casting (capsule, sphere, box or point)
//!
//! # Queries
//!
//! Casts sweep a shape from an origin along a direction and return:
//! - How far the shape traveled before impact
//! - The contact point and surface normal
//! - The layers and ID of the brush that was hit

mod flags;
mod trace;
mod world;

pub use flags::CollisionLayers;
pub use trace::{TraceResult, TraceShape};
pub use world::{BrushId, CollisionBrush, CollisionWorld};
