//! Jump buffering and coyote time.
//!
//! A jump pressed shortly before landing is remembered and fires on
//! touchdown (jump buffer). A jump pressed shortly after walking off a ledge
//! still counts as a grounded jump (coyote time). Both windows are counted
//! down in whole milliseconds once per tick and clear themselves on expiry.

use serde::{Deserialize, Serialize};

use super::config::TimeSettings;
use super::ground::GroundContact;

/// Buffered jump input consumed by the locomotion states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBuffer {
    /// Jump was pressed this tick. Cleared at the end of every tick.
    jump_requested: bool,

    /// Jump button is currently down.
    jump_held: bool,

    /// An airborne press is waiting for the ground.
    jump_buffered: bool,

    /// Time left on the jump buffer (ms).
    jump_buffer_ms: u32,

    /// The actor recently left the ground.
    coyote_buffered: bool,

    /// Time left on coyote time (ms).
    coyote_ms: u32,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a jump press.
    ///
    /// Every press raises the request for this tick; a press while airborne
    /// also starts the jump buffer.
    pub fn press_jump(&mut self, grounded: bool, settings: &TimeSettings) {
        self.jump_requested = true;
        self.jump_held = true;

        if !grounded {
            self.jump_buffered = true;
            self.jump_buffer_ms = settings.jump_buffer_ms;
        }
    }

    pub fn hold_jump(&mut self) {
        self.jump_held = true;
    }

    pub fn release_jump(&mut self) {
        self.jump_held = false;
    }

    /// Start coyote time if the actor was grounded last tick.
    pub fn arm_coyote(&mut self, contact: &GroundContact, settings: &TimeSettings) {
        if contact.was_grounded {
            self.coyote_buffered = true;
            self.coyote_ms = settings.coyote_time_ms;
        }
    }

    /// Advance both windows by one tick.
    ///
    /// Also arms coyote time on the tick the actor leaves the ground.
    pub fn update(&mut self, contact: &GroundContact, settings: &TimeSettings, delta_time_ms: u32) {
        if self.jump_buffered {
            self.jump_buffer_ms = self.jump_buffer_ms.saturating_sub(delta_time_ms);
            if self.jump_buffer_ms == 0 {
                self.jump_buffered = false;
            }
        }

        if self.coyote_buffered {
            self.coyote_ms = self.coyote_ms.saturating_sub(delta_time_ms);
            if self.coyote_ms == 0 {
                self.coyote_buffered = false;
            }
        }

        if contact.just_left() && !self.coyote_buffered {
            self.coyote_buffered = true;
            self.coyote_ms = settings.coyote_time_ms;
        }
    }

    /// Drop the request, buffer and coyote window together.
    pub fn clear_jump_flags(&mut self) {
        self.jump_requested = false;
        self.clear_buffers();
    }

    /// Drop the jump buffer and coyote window.
    pub fn clear_buffers(&mut self) {
        self.jump_buffered = false;
        self.jump_buffer_ms = 0;
        self.coyote_buffered = false;
        self.coyote_ms = 0;
    }

    /// End-of-tick reset of the press edge.
    pub fn consume_request(&mut self) {
        self.jump_requested = false;
    }

    #[inline]
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    #[inline]
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    #[inline]
    pub fn jump_buffered(&self) -> bool {
        self.jump_buffered
    }

    #[inline]
    pub fn coyote_buffered(&self) -> bool {
        self.coyote_buffered
    }

    /// A press this tick or a buffered one.
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.jump_requested || self.jump_buffered
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: u32 = 20;

    const AIRBORNE: GroundContact = GroundContact {
        is_grounded: false,
        was_grounded: false,
        just_landed: false,
    };

    const LEFT_LEDGE: GroundContact = GroundContact {
        is_grounded: false,
        was_grounded: true,
        just_landed: false,
    };

    #[test]
    fn test_grounded_press_does_not_buffer() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        buffer.press_jump(true, &settings);

        assert!(buffer.jump_requested());
        assert!(buffer.jump_held());
        assert!(!buffer.jump_buffered());
    }

    #[test]
    fn test_jump_buffer_expires_after_duration() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        buffer.press_jump(false, &settings);
        assert!(buffer.jump_buffered());

        let ticks = settings.jump_buffer_ms / FRAME_MS;
        for tick in 1..ticks {
            buffer.update(&AIRBORNE, &settings, FRAME_MS);
            assert!(buffer.jump_buffered(), "Buffer cleared early at tick {}", tick);
        }

        buffer.update(&AIRBORNE, &settings, FRAME_MS);
        assert!(!buffer.jump_buffered(), "Buffer should clear at exactly 200ms");
    }

    #[test]
    fn test_coyote_expires_after_duration() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        // Armed on the tick the ground disappears
        buffer.update(&LEFT_LEDGE, &settings, FRAME_MS);
        assert!(buffer.coyote_buffered());

        let ticks = settings.coyote_time_ms / FRAME_MS;
        for tick in 1..ticks {
            buffer.update(&AIRBORNE, &settings, FRAME_MS);
            assert!(buffer.coyote_buffered(), "Coyote cleared early at tick {}", tick);
        }

        buffer.update(&AIRBORNE, &settings, FRAME_MS);
        assert!(!buffer.coyote_buffered(), "Coyote should clear at exactly 100ms");
    }

    #[test]
    fn test_arm_coyote_requires_previous_ground() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        buffer.arm_coyote(&AIRBORNE, &settings);
        assert!(!buffer.coyote_buffered());

        buffer.arm_coyote(&LEFT_LEDGE, &settings);
        assert!(buffer.coyote_buffered());
    }

    #[test]
    fn test_request_is_single_tick_edge() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        buffer.press_jump(false, &settings);
        buffer.consume_request();

        assert!(!buffer.jump_requested());
        assert!(buffer.jump_held(), "Hold outlives the press edge");
        assert!(buffer.wants_jump(), "Buffered press still wants a jump");

        buffer.release_jump();
        assert!(!buffer.jump_held());
    }

    #[test]
    fn test_clear_jump_flags() {
        let settings = TimeSettings::default();
        let mut buffer = InputBuffer::new();

        buffer.press_jump(false, &settings);
        buffer.update(&LEFT_LEDGE, &settings, FRAME_MS);
        buffer.clear_jump_flags();

        assert!(!buffer.wants_jump());
        assert!(!buffer.coyote_buffered());
    }
}
