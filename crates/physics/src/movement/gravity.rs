//! Gravity derived from jump shape.
//!
//! Designers specify how high and how far a jump goes; gravity and launch
//! speed are solved from that. The ascent runs under `ascend_gravity` and
//! the descent under the steeper `fast_fall_gravity`, so the arc is split
//! into two half-parabolas whose lateral lengths together equal the
//! requested jump distance:
//!
//! ```text
//! L   = 2 * D * sqrt(m) / (1 + sqrt(m))        lateral constant
//! g   = -2 * H * v^2 / (L / 2)^2               ascend gravity
//! g_f = g * m                                  fast-fall gravity
//! v0  = 2 * H * v / (L / 2)                    initial jump speed
//! ```
//!
//! where `H` is the max height, `D` the lateral distance, `m` the fast-fall
//! multiplier and `v` the max horizontal speed.

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

use super::config::{JumpAction, MoveAction};

/// Gravity constants solved from a [`JumpAction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityModel {
    /// Lateral distance covered while ascending, doubled.
    pub lateral_constant: f32,
    /// Gravity while rising with jump held (negative).
    pub ascend_gravity: f32,
    /// Gravity after the apex or on early release (negative).
    pub fast_fall_gravity: f32,
    /// Upward launch speed of a full jump.
    pub initial_jump_speed: f32,
}

impl GravityModel {
    /// Solve gravity for a jump shape at a given top speed.
    pub fn derive(jump: &JumpAction, max_horizontal_speed: f32) -> Result<Self, PhysicsError> {
        jump.validate()?;
        crate::error::ensure_positive("max_horizontal_speed", max_horizontal_speed)?;

        let sqrt_multiplier = jump.fast_fall_multiplier.sqrt();
        let lateral_constant =
            (2.0 * jump.max_jump_lateral_distance * sqrt_multiplier) / (1.0 + sqrt_multiplier);
        let half_lateral = lateral_constant / 2.0;

        let ascend_gravity =
            (-2.0 * jump.max_jump_height * max_horizontal_speed.powi(2)) / half_lateral.powi(2);
        let initial_jump_speed = (2.0 * jump.max_jump_height * max_horizontal_speed) / half_lateral;

        Ok(Self {
            lateral_constant,
            ascend_gravity,
            fast_fall_gravity: ascend_gravity * jump.fast_fall_multiplier,
            initial_jump_speed,
        })
    }

    /// Height reached by a full jump under ascend gravity.
    pub fn apex_height(&self) -> f32 {
        self.initial_jump_speed.powi(2) / (-2.0 * self.ascend_gravity)
    }

    /// Total lateral travel of a full jump at `speed`, ascending under
    /// ascend gravity and descending back to launch height under fast-fall.
    pub fn lateral_reach(&self, speed: f32) -> f32 {
        let time_up = self.initial_jump_speed / -self.ascend_gravity;
        let time_down = (2.0 * self.apex_height() / -self.fast_fall_gravity).sqrt();
        speed * (time_up + time_down)
    }
}

/// Move and jump parameters with their solved gravity.
///
/// Every locomotion state caches one of these on entry. A body transform
/// swaps in a different set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSet {
    pub move_action: MoveAction,
    pub jump_action: JumpAction,
    pub gravity: GravityModel,
}

impl ActionSet {
    pub fn new(move_action: MoveAction, jump_action: JumpAction) -> Result<Self, PhysicsError> {
        move_action.validate()?;
        let gravity = GravityModel::derive(&jump_action, move_action.max_horizontal_speed)?;
        Ok(Self {
            move_action,
            jump_action,
            gravity,
        })
    }
}
