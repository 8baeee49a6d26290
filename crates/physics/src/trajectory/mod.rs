//! Closed-form trajectories for tongue abilities and throws.

mod grapple;
mod swing;
mod throw;

pub use grapple::GrappleArc;
pub use swing::Pendulum;
pub use throw::{launch_speed, throw_velocity, ConeAttraction, ThrowArc};
