//! Error types for movement configuration.

use thiserror::Error;

/// A tunable that cannot produce a valid simulation.
///
/// Runtime conditions (unreachable ability targets, degenerate geometry) are
/// recovered locally and never surface here; only configuration does.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Check that a tunable is strictly positive and finite.
pub fn ensure_positive(name: &'static str, value: f32) -> Result<(), PhysicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::NonPositive { name, value })
    }
}

/// Check that a tunable is finite and not negative.
pub fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), PhysicsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::Negative { name, value })
    }
}

/// Check that a tunable lies within an inclusive range.
pub fn ensure_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), PhysicsError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PhysicsError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        assert!(ensure_positive("speed", 1.0).is_ok());
        assert!(ensure_positive("speed", 0.0).is_err());
        assert!(ensure_positive("speed", f32::NAN).is_err());
        assert!(ensure_non_negative("delay", 0.0).is_ok());
        assert!(ensure_range("angle", 90.0, 0.0, 89.0).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = PhysicsError::NonPositive {
            name: "max_jump_height",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "max_jump_height must be positive and finite, got -1");
    }
}
