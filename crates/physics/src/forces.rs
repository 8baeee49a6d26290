//! External forces.
//!
//! Wind zones and one-shot impulses register themselves with the actor's
//! [`ExternalForceAggregator`] by id. Each tick the active locomotion state
//! reads the summed force once and scales it by its own multiplier, so wind
//! barely moves a grounded actor but carries an airborne one.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, PhysicsError};
use crate::movement::StateTag;

/// Stable identifier of a force source (usually the emitting volume).
pub type ForceSourceId = u32;

/// Designer-facing wind parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub direction: Vec3,
    pub strength: f32,
    /// Seconds blowing along `direction`.
    pub first_half_cycle: f32,
    /// Seconds blowing against `direction`.
    pub last_half_cycle: f32,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            direction: Vec3::X,
            strength: 10.0,
            first_half_cycle: 2.0,
            last_half_cycle: 2.0,
        }
    }
}

impl WindSettings {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_non_negative("wind.strength", self.strength)?;
        ensure_non_negative("wind.first_half_cycle", self.first_half_cycle)?;
        ensure_non_negative("wind.last_half_cycle", self.last_half_cycle)
    }

    /// Wind only alternates when both halves have a duration.
    pub fn is_cyclic(&self) -> bool {
        self.first_half_cycle > 0.0 && self.last_half_cycle > 0.0
    }
}

/// Alternating wind with a duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    settings: WindSettings,
    sign: f32,
    timer: f32,
}

impl Wind {
    pub fn new(settings: WindSettings) -> Self {
        Self {
            settings,
            sign: 1.0,
            timer: 0.0,
        }
    }

    pub fn settings(&self) -> &WindSettings {
        &self.settings
    }

    /// Advance the duty cycle, flipping direction at the end of each half.
    pub fn advance(&mut self, delta_time: f32) {
        if !self.settings.is_cyclic() {
            return;
        }

        self.timer += delta_time;
        let half = if self.sign > 0.0 {
            self.settings.first_half_cycle
        } else {
            self.settings.last_half_cycle
        };

        if self.timer >= half {
            self.sign = -self.sign;
            self.timer = 0.0;
        }
    }

    pub fn force(&self) -> Vec3 {
        self.settings.direction.normalize_or_zero() * self.settings.strength * self.sign
    }

    /// True while blowing along the configured direction.
    pub fn is_forward(&self) -> bool {
        self.sign > 0.0
    }
}

/// Something that pushes on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForceSource {
    /// Continuous force while registered.
    Wind(Wind),
    /// Applied on the next read, then dropped.
    Impulse(Vec3),
}

impl ForceSource {
    fn force(&self) -> Vec3 {
        match self {
            ForceSource::Wind(wind) => wind.force(),
            ForceSource::Impulse(force) => *force,
        }
    }
}

/// How strongly each locomotion state feels external forces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMultipliers {
    pub grounded: f32,
    pub airborne: f32,
    pub grappling: f32,
    pub swinging: f32,
}

impl Default for StateMultipliers {
    fn default() -> Self {
        Self {
            grounded: 0.1,
            airborne: 1.0,
            grappling: 0.5,
            swinging: 1.0,
        }
    }
}

impl StateMultipliers {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        ensure_non_negative("multipliers.grounded", self.grounded)?;
        ensure_non_negative("multipliers.airborne", self.airborne)?;
        ensure_non_negative("multipliers.grappling", self.grappling)?;
        ensure_non_negative("multipliers.swinging", self.swinging)
    }

    pub fn for_state(&self, state: StateTag) -> f32 {
        match state {
            StateTag::Grounded => self.grounded,
            StateTag::Falling | StateTag::Jumping => self.airborne,
            StateTag::Grappling => self.grappling,
            StateTag::Swinging => self.swinging,
        }
    }
}

/// Sums every registered force source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalForceAggregator {
    sources: BTreeMap<ForceSourceId, ForceSource>,
}

impl ExternalForceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source. Returns false (and changes nothing) if `id` is
    /// already registered.
    pub fn register(&mut self, id: ForceSourceId, source: ForceSource) -> bool {
        if self.sources.contains_key(&id) {
            return false;
        }
        log::debug!("force source {} registered", id);
        self.sources.insert(id, source);
        true
    }

    /// Remove a source. Returns false if it was not registered.
    pub fn unregister(&mut self, id: ForceSourceId) -> bool {
        let removed = self.sources.remove(&id).is_some();
        if removed {
            log::debug!("force source {} unregistered", id);
        }
        removed
    }

    pub fn is_registered(&self, id: ForceSourceId) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Advance every wind duty cycle.
    pub fn advance(&mut self, delta_time: f32) {
        for source in self.sources.values_mut() {
            if let ForceSource::Wind(wind) = source {
                wind.advance(delta_time);
            }
        }
    }

    /// Sum of all forces. Impulses are consumed by the read.
    pub fn total_force(&mut self) -> Vec3 {
        let total = self.sources.values().map(ForceSource::force).sum();
        self.sources
            .retain(|_, source| !matches!(source, ForceSource::Impulse(_)));
        total
    }

    /// Sum of all forces without consuming impulses.
    pub fn peek_force(&self) -> Vec3 {
        self.sources.values().map(ForceSource::force).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind(strength: f32, half: f32) -> ForceSource {
        ForceSource::Wind(Wind::new(WindSettings {
            direction: Vec3::X,
            strength,
            first_half_cycle: half,
            last_half_cycle: half,
        }))
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut forces = ExternalForceAggregator::new();

        assert!(forces.register(7, wind(10.0, 1.0)));
        assert!(!forces.register(7, wind(99.0, 1.0)));
        assert_eq!(forces.len(), 1);
        assert_eq!(forces.peek_force(), Vec3::new(10.0, 0.0, 0.0));

        assert!(forces.unregister(7));
        assert!(!forces.unregister(7));
        assert!(forces.is_empty());
    }

    #[test]
    fn test_impulse_consumed_on_read() {
        let mut forces = ExternalForceAggregator::new();
        forces.register(1, wind(2.0, 0.0));
        forces.register(2, ForceSource::Impulse(Vec3::new(0.0, 5.0, 0.0)));

        assert_eq!(forces.total_force(), Vec3::new(2.0, 5.0, 0.0));
        assert_eq!(forces.total_force(), Vec3::new(2.0, 0.0, 0.0));
        assert!(!forces.is_registered(2));
    }

    #[test]
    fn test_wind_duty_cycle_flips() {
        let mut forces = ExternalForceAggregator::new();
        forces.register(1, wind(4.0, 0.1));

        for _ in 0..4 {
            forces.advance(0.02);
        }
        assert!(forces.peek_force().x > 0.0, "Still in first half");

        forces.advance(0.03);
        assert!(forces.peek_force().x < 0.0, "Should flip after the first half");
    }

    #[test]
    fn test_zero_duration_wind_is_constant() {
        let mut w = Wind::new(WindSettings {
            first_half_cycle: 0.0,
            ..Default::default()
        });
        for _ in 0..1000 {
            w.advance(0.02);
        }
        assert!(w.is_forward());
    }

    #[test]
    fn test_state_multipliers() {
        let multipliers = StateMultipliers::default();
        assert_eq!(multipliers.for_state(StateTag::Jumping), multipliers.airborne);
        assert_eq!(multipliers.for_state(StateTag::Falling), multipliers.airborne);
        assert!(multipliers.for_state(StateTag::Grounded) < multipliers.airborne);
    }
}
