//! Movement configuration.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds) unless a field name says otherwise;
//! timers are whole milliseconds so that buffering stays exact at any
//! fixed tick rate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::TraceShape;
use crate::error::{ensure_non_negative, ensure_positive, ensure_range, PhysicsError};
use crate::forces::StateMultipliers;

use super::state::BodyForm;

/// Horizontal movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveAction {
    /// Top lateral speed (meters/second).
    pub max_horizontal_speed: f32,

    /// Terminal vertical speed in either direction (meters/second).
    pub max_vertical_speed: f32,

    /// Rate at which velocity closes on the target speed.
    pub acceleration: f32,

    /// Closing rate used instead of `acceleration` when reversing direction.
    pub deceleration: f32,

    /// Speed lost per second with no input (meters/second²).
    pub ground_friction: f32,

    /// Snap velocity straight to the input target, ignoring momentum.
    pub precision_movement: bool,
}

impl Default for MoveAction {
    fn default() -> Self {
        Self {
            max_horizontal_speed: 7.0,
            max_vertical_speed: 50.0,
            acceleration: 5.0,
            deceleration: 10.0,
            ground_friction: 5.0,
            precision_movement: false,
        }
    }
}

impl MoveAction {
    /// Rolling ball body: faster and slipperier.
    pub fn ball() -> Self {
        Self {
            max_horizontal_speed: 10.0,
            acceleration: 3.0,
            deceleration: 4.0,
            ground_friction: 1.5,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("max_horizontal_speed", self.max_horizontal_speed)?;
        ensure_positive("max_vertical_speed", self.max_vertical_speed)?;
        ensure_non_negative("acceleration", self.acceleration)?;
        ensure_non_negative("deceleration", self.deceleration)?;
        ensure_non_negative("ground_friction", self.ground_friction)
    }
}

/// Designer-facing jump shape.
///
/// Gravity is derived from these values rather than set directly, see
/// [`GravityModel`](super::GravityModel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpAction {
    /// Apex height of a full jump (meters).
    pub max_jump_height: f32,

    /// Lateral distance covered by a full jump at top speed (meters).
    pub max_jump_lateral_distance: f32,

    /// How much stronger gravity is after the apex or on early release.
    pub fast_fall_multiplier: f32,
}

impl Default for JumpAction {
    fn default() -> Self {
        Self {
            max_jump_height: 5.0,
            max_jump_lateral_distance: 10.0,
            fast_fall_multiplier: 3.0,
        }
    }
}

impl JumpAction {
    /// Rolling ball body: low, long hops.
    pub fn ball() -> Self {
        Self {
            max_jump_height: 2.5,
            max_jump_lateral_distance: 12.0,
            fast_fall_multiplier: 2.0,
        }
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("max_jump_height", self.max_jump_height)?;
        ensure_positive("max_jump_lateral_distance", self.max_jump_lateral_distance)?;
        ensure_positive("fast_fall_multiplier", self.fast_fall_multiplier)
    }
}

/// Global collision and numeric settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Inset kept between the actor and any surface (meters).
    pub skin_width: f32,

    /// Input and speed magnitudes below this count as zero.
    pub float_precision_threshold: f32,

    /// Displacements shorter than this skip collision entirely (meters).
    pub resolve_epsilon: f32,

    /// Steepest surface, in degrees from up, that still stops a fall.
    pub max_slope_angle: f32,

    /// Recursion limit for collide-and-slide.
    pub max_resolve_depth: u32,

    /// Window after a grapple launch during which contacts are ignored.
    pub grapple_ignore_ms: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            skin_width: 0.02,
            float_precision_threshold: 0.01,
            resolve_epsilon: 0.001,
            max_slope_angle: 55.0,
            max_resolve_depth: 5,
            grapple_ignore_ms: 50,
        }
    }
}

impl PhysicsSettings {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("skin_width", self.skin_width)?;
        ensure_non_negative("float_precision_threshold", self.float_precision_threshold)?;
        ensure_positive("resolve_epsilon", self.resolve_epsilon)?;
        ensure_range("max_slope_angle", self.max_slope_angle, 0.0, 90.0)
    }
}

/// Input grace windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// How long an airborne jump press is remembered.
    pub jump_buffer_ms: u32,

    /// How long after walking off a ledge a jump is still honored.
    pub coyote_time_ms: u32,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            jump_buffer_ms: 200,
            coyote_time_ms: 100,
        }
    }
}

/// Actor collision dimensions for both body forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorShape {
    /// Capsule cap radius (meters).
    pub capsule_radius: f32,

    /// Half the distance between the capsule's cap centers (meters).
    pub capsule_half_segment: f32,

    /// Radius of the transformed ball body (meters).
    pub sphere_radius: f32,

    /// Ball center relative to the actor position.
    pub sphere_offset: Vec3,
}

impl Default for ActorShape {
    fn default() -> Self {
        Self {
            capsule_radius: 0.5,
            capsule_half_segment: 0.5,
            sphere_radius: 0.5,
            sphere_offset: Vec3::new(0.0, -0.5, 0.0),
        }
    }
}

impl ActorShape {
    /// Collision shape and its center offset for a body form.
    pub fn for_form(&self, form: BodyForm) -> (TraceShape, Vec3) {
        match form {
            BodyForm::Base => (
                TraceShape::Capsule {
                    radius: self.capsule_radius,
                    half_segment: self.capsule_half_segment,
                },
                Vec3::ZERO,
            ),
            BodyForm::Transformed => (
                TraceShape::Sphere {
                    radius: self.sphere_radius,
                },
                self.sphere_offset,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("capsule_radius", self.capsule_radius)?;
        ensure_non_negative("capsule_half_segment", self.capsule_half_segment)?;
        ensure_positive("sphere_radius", self.sphere_radius)
    }
}

/// Downward box cast used for ground detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundCheck {
    /// Cast start relative to the actor position.
    pub vertical_offset: f32,

    /// Half-size of the cast box.
    pub half_extents: Vec3,

    /// How far below its start the cast reaches (meters).
    pub check_length: f32,
}

impl Default for GroundCheck {
    fn default() -> Self {
        Self {
            vertical_offset: -0.5,
            half_extents: Vec3::new(0.4, 0.1, 0.4),
            check_length: 0.5,
        }
    }
}

/// Ceiling rays used to slip past overhang corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushOffRays {
    /// Lateral offset of the two inner rays.
    pub inner_offset: f32,

    /// Lateral offset of the two outer rays.
    pub outer_offset: f32,

    /// Ray origin height above the actor position, before the skin inset.
    pub cast_height: f32,

    /// Lateral nudge applied when only one outer ray is blocked.
    pub push_distance: f32,
}

impl Default for PushOffRays {
    fn default() -> Self {
        Self {
            inner_offset: 0.25,
            outer_offset: 0.5,
            cast_height: 1.0,
            push_distance: 0.25,
        }
    }
}

/// Tongue grapple tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleAbility {
    /// Farthest reachable grapple point (meters).
    pub max_distance: f32,

    /// Lockout after each press.
    pub cooldown_ms: u32,

    /// Wind-up between the press and the launch, with input frozen.
    pub delay_ms: u32,

    /// Extra height the launch arc climbs above the higher endpoint.
    pub overshoot_height: f32,
}

impl Default for GrappleAbility {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            cooldown_ms: 2000,
            delay_ms: 1000,
            overshoot_height: 1.0,
        }
    }
}

impl GrappleAbility {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("grapple.max_distance", self.max_distance)?;
        ensure_non_negative("grapple.overshoot_height", self.overshoot_height)
    }
}

/// Tongue swing tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingAbility {
    /// Farthest reachable swing anchor (meters).
    pub max_distance: f32,

    /// Lockout after each press.
    pub cooldown_ms: u32,

    /// Wind-up between the press and the attach, with input frozen.
    pub delay_ms: u32,

    /// Fraction of tangential speed bled off per second.
    pub damping: f32,

    /// Tangential acceleration from full move input (meters/second²).
    pub user_control_force: f32,
}

impl Default for SwingAbility {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            cooldown_ms: 2000,
            delay_ms: 1000,
            damping: 0.1,
            user_control_force: 5.0,
        }
    }
}

impl SwingAbility {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("swing.max_distance", self.max_distance)?;
        ensure_non_negative("swing.damping", self.damping)?;
        ensure_non_negative("swing.user_control_force", self.user_control_force)
    }
}

/// Configuration for player movement physics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_action: MoveAction,
    pub jump_action: JumpAction,
    pub physics: PhysicsSettings,
    pub time: TimeSettings,
    pub shape: ActorShape,
    pub ground_check: GroundCheck,
    pub push_off: PushOffRays,
    pub force_multipliers: StateMultipliers,
}

impl MovementConfig {
    /// Tight, low-float tuning for precise platforming.
    pub fn snappy() -> Self {
        Self {
            move_action: MoveAction {
                precision_movement: true,
                ..Default::default()
            },
            jump_action: JumpAction {
                max_jump_height: 4.0,
                max_jump_lateral_distance: 8.0,
                fast_fall_multiplier: 4.0,
            },
            time: TimeSettings {
                jump_buffer_ms: 150,
                coyote_time_ms: 80,
            },
            ..Default::default()
        }
    }

    /// Check every block for values the simulation can't run with.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        self.move_action.validate()?;
        self.jump_action.validate()?;
        self.physics.validate()?;
        self.shape.validate()?;
        ensure_positive("ground_check.check_length", self.ground_check.check_length)?;
        ensure_non_negative("push_off.push_distance", self.push_off.push_distance)?;
        self.force_multipliers.validate()
    }
}
