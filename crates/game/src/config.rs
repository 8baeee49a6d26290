//! Simulation configuration.
//!
//! Everything the game layer reads at startup: tick rate, movement tuning
//! and the ability blocks. A config can be written in RON; fields that are
//! left out keep their defaults.
//!
//! ```text
//! (
//!     tick_rate: 50,
//!     movement: (jump_action: (max_jump_height: 4.0)),
//!     abilities: (suction: (range: 8.0)),
//! )
//! ```

use std::path::{Path, PathBuf};

use lilypad_physics::error::{ensure_non_negative, ensure_positive, ensure_range};
use lilypad_physics::movement::{GrappleAbility, JumpAction, MoveAction, SwingAbility};
use lilypad_physics::{ActionSet, MovementConfig, PhysicsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(#[from] PhysicsError),
}

/// Suction and throw tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuctionAbility {
    /// Reach of the suction cone and of the extended tongue (meters).
    pub range: f32,

    /// Pull at point-blank range on the cone axis.
    pub max_force: f32,

    /// Full opening angle of the cone (degrees).
    pub cone_angle: f32,

    /// Bodies this close to the mouth are caught.
    pub capture_distance: f32,

    /// A held body this far from the tongue tip is dropped.
    pub drop_distance: f32,

    /// Catch radius around the tongue tip.
    pub pickup_radius: f32,

    /// Tongue speed going out (meters/second).
    pub extend_speed: f32,

    /// Tongue speed coming back (meters/second).
    pub retract_speed: f32,

    /// Samples in the throw preview.
    pub arc_points: usize,

    /// Seconds between preview samples.
    pub arc_time_step: f32,

    /// The tongue tip counts as arrived within this distance.
    pub tip_epsilon: f32,
}

impl Default for SuctionAbility {
    fn default() -> Self {
        Self {
            range: 6.0,
            max_force: 20.0,
            cone_angle: 45.0,
            capture_distance: 2.0,
            drop_distance: 1.5,
            pickup_radius: 0.35,
            extend_speed: 5.0,
            retract_speed: 5.0,
            arc_points: 30,
            arc_time_step: 0.1,
            tip_epsilon: 0.03,
        }
    }
}

impl SuctionAbility {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("suction.range", self.range)?;
        ensure_non_negative("suction.max_force", self.max_force)?;
        ensure_range("suction.cone_angle", self.cone_angle, 0.0, 360.0)?;
        ensure_non_negative("suction.capture_distance", self.capture_distance)?;
        ensure_positive("suction.drop_distance", self.drop_distance)?;
        ensure_non_negative("suction.pickup_radius", self.pickup_radius)?;
        ensure_positive("suction.extend_speed", self.extend_speed)?;
        ensure_positive("suction.retract_speed", self.retract_speed)?;
        ensure_positive("suction.arc_time_step", self.arc_time_step)?;
        ensure_positive("suction.tip_epsilon", self.tip_epsilon)
    }
}

/// Ball-form transform tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformAbility {
    /// Lockout after reverting to the base body.
    pub cooldown_ms: u32,

    /// Move tuning while transformed.
    pub move_action: MoveAction,

    /// Jump tuning while transformed.
    pub jump_action: JumpAction,
}

impl Default for TransformAbility {
    fn default() -> Self {
        Self {
            cooldown_ms: 1000,
            move_action: MoveAction::ball(),
            jump_action: JumpAction::ball(),
        }
    }
}

impl TransformAbility {
    /// Action set used while transformed.
    pub fn actions(&self) -> Result<ActionSet, PhysicsError> {
        ActionSet::new(self.move_action, self.jump_action)
    }
}

/// Tongue geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TongueSettings {
    /// Resting length of the aim line (meters).
    pub aim_length: f32,
}

impl Default for TongueSettings {
    fn default() -> Self {
        Self { aim_length: 2.0 }
    }
}

/// All ability blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    pub grapple: GrappleAbility,
    pub swing: SwingAbility,
    pub suction: SuctionAbility,
    pub transform: TransformAbility,
    pub tongue: TongueSettings,
}

impl AbilityConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        self.grapple.validate()?;
        self.swing.validate()?;
        self.suction.validate()?;
        self.transform.actions()?;
        ensure_positive("tongue.aim_length", self.tongue.aim_length)
    }
}

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Gravity applied to dynamic bodies (negative is down).
    pub world_gravity: f32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    pub abilities: AbilityConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            world_gravity: -9.81,
            movement: MovementConfig::default(),
            abilities: AbilityConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Time step per tick in whole milliseconds.
    pub fn delta_time_ms(&self) -> u32 {
        (self.delta_time() * 1000.0).round() as u32
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_positive("tick_rate", self.tick_rate as f32)?;
        if !self.world_gravity.is_finite() {
            return Err(PhysicsError::Negative {
                name: "world_gravity",
                value: self.world_gravity,
            });
        }
        self.movement.validate()?;
        self.abilities.validate()
    }

    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delta_time_ms(), 20);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = SimulationConfig::from_ron_str(
            "(tick_rate: 100, abilities: (suction: (range: 8.0)))",
        )
        .unwrap();

        assert_eq!(config.tick_rate, 100);
        assert_eq!(config.delta_time_ms(), 10);
        assert_eq!(config.abilities.suction.range, 8.0);
        assert_eq!(config.abilities.suction.cone_angle, 45.0, "Untouched fields keep defaults");
        assert_eq!(config.movement, MovementConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = SimulationConfig::from_ron_str("(abilities: (suction: (range: -1.0)))");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = SimulationConfig::from_ron_str("(tick_rate: 0)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = SimulationConfig::from_ron_str("(tick_rate: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load("/nonexistent/lilypad.ron");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
