//! Player input handling.
//!
//! Raw per-tick button states come in as [`PlayerInput`]. The
//! [`InputRouter`] compares them with the previous tick to find press and
//! release edges, turns the movement part into a [`PlayerCommand`] for the
//! physics system and reports ability button edges separately.
//!
//! Abilities can freeze input for a while (the wind-up before a grapple,
//! for example). While frozen the move axis reads zero and jump presses
//! are dropped.

use glam::Vec3;
use lilypad_physics::PlayerCommand;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,

    /// Ability buttons pressed.
    pub abilities: AbilityButtons,

    /// World point under the cursor, used to aim the tongue.
    pub aim_point: Vec3,
}

/// Ability button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityButtons {
    pub grapple: bool,
    pub swing: bool,
    pub suction: bool,
    pub transform: bool,
}

impl AbilityButtons {
    pub fn is_down(&self, id: AbilityId) -> bool {
        match id {
            AbilityId::Grapple => self.grapple,
            AbilityId::Swing => self.swing,
            AbilityId::Suction => self.suction,
            AbilityId::Transform => self.transform,
        }
    }
}

/// Button edge for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonPhase {
    /// Went down this tick.
    Pressed,
    /// Still down.
    Held,
    /// Went up this tick.
    Released,
}

impl ButtonPhase {
    fn from_states(was_down: bool, is_down: bool) -> Option<Self> {
        match (was_down, is_down) {
            (false, true) => Some(ButtonPhase::Pressed),
            (true, true) => Some(ButtonPhase::Held),
            (true, false) => Some(ButtonPhase::Released),
            (false, false) => None,
        }
    }
}

impl PlayerInput {
    /// Move axis from the direction keys. Opposite keys cancel out.
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.move_right {
            axis += 1.0;
        }
        if self.move_left {
            axis -= 1.0;
        }
        axis
    }

    /// Convert to a physics command.
    ///
    /// # Arguments
    ///
    /// * `previous` - Input from the previous tick, for jump edges
    pub fn to_command(&self, previous: &PlayerInput) -> PlayerCommand {
        PlayerCommand {
            move_axis: self.move_axis(),
            jump_pressed: self.jump && !previous.jump,
            jump_held: self.jump,
            jump_released: !self.jump && previous.jump,
        }
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.move_left != self.move_right
    }
}

/// One tick of routed input.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedInput {
    pub command: PlayerCommand,
    pub abilities: Vec<(AbilityId, ButtonPhase)>,
    pub aim_point: Vec3,
}

/// Edge detection and input freezing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRouter {
    previous: PlayerInput,
    freeze_ms: u32,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze movement input for `duration_ms`.
    ///
    /// An existing longer freeze is kept.
    pub fn freeze(&mut self, duration_ms: u32) {
        self.freeze_ms = self.freeze_ms.max(duration_ms);
        log::debug!("input frozen for {}ms", self.freeze_ms);
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.freeze_ms > 0
    }

    /// Route this tick's input and count the freeze down.
    pub fn route(&mut self, input: &PlayerInput, delta_time_ms: u32) -> RoutedInput {
        let mut command = input.to_command(&self.previous);
        if self.is_frozen() {
            self.freeze_ms = self.freeze_ms.saturating_sub(delta_time_ms);
            command.move_axis = 0.0;
            command.jump_pressed = false;
        }

        let abilities = AbilityId::ALL
            .iter()
            .filter_map(|&id| {
                ButtonPhase::from_states(
                    self.previous.abilities.is_down(id),
                    input.abilities.is_down(id),
                )
                .map(|phase| (id, phase))
            })
            .collect();

        self.previous = *input;

        RoutedInput {
            command,
            abilities,
            aim_point: input.aim_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_edges() {
        let idle = PlayerInput::default();
        let jumping = PlayerInput {
            jump: true,
            ..Default::default()
        };

        let pressed = jumping.to_command(&idle);
        assert!(pressed.jump_pressed && pressed.jump_held);

        let held = jumping.to_command(&jumping);
        assert!(!held.jump_pressed && held.jump_held);

        let released = idle.to_command(&jumping);
        assert!(released.jump_released && !released.jump_held);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let input = PlayerInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };

        assert_eq!(input.move_axis(), 0.0);
        assert!(!input.has_movement());
    }

    #[test]
    fn test_freeze_blocks_move_and_jump() {
        let mut router = InputRouter::new();
        let input = PlayerInput {
            move_right: true,
            jump: true,
            ..Default::default()
        };

        router.freeze(40);
        let routed = router.route(&input, 20);
        assert_eq!(routed.command.move_axis, 0.0);
        assert!(!routed.command.jump_pressed, "Jump press swallowed while frozen");

        router.route(&PlayerInput::default(), 20);
        assert!(!router.is_frozen());

        let routed = router.route(&input, 20);
        assert_eq!(routed.command.move_axis, 1.0);
        assert!(routed.command.jump_pressed);
    }

    #[test]
    fn test_ability_edges() {
        let mut router = InputRouter::new();
        let mut input = PlayerInput::default();
        input.abilities.grapple = true;

        let routed = router.route(&input, 20);
        assert_eq!(routed.abilities, vec![(AbilityId::Grapple, ButtonPhase::Pressed)]);

        let routed = router.route(&input, 20);
        assert_eq!(routed.abilities, vec![(AbilityId::Grapple, ButtonPhase::Held)]);

        let routed = router.route(&PlayerInput::default(), 20);
        assert_eq!(routed.abilities, vec![(AbilityId::Grapple, ButtonPhase::Released)]);

        let routed = router.route(&PlayerInput::default(), 20);
        assert!(routed.abilities.is_empty());
    }
}
