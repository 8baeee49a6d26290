//! Locomotion state machine.
//!
//! Exactly one state is active at a time. Every state implements the same
//! narrow [`Locomotion`] interface and owns its transient data (cached
//! action set, grapple target, swing pivot). The
//! [`LocomotionStateMachine`] driver pairs every exit with an enter and
//! owns event delivery: a state only sees the events it declared in
//! [`Locomotion::subscriptions`], and only while it is active.
//!
//! # Transitions
//!
//! ```text
//! Grounded  -> Jumping   (jump requested or buffered)
//!           -> Falling   (ground lost)
//! Falling   -> Grounded  (landed)
//!           -> Jumping   (coyote jump)
//! Jumping   -> Falling   (vertical velocity <= 0)
//! Grappling -> Jumping | Grounded | Falling  (contact after the ignore window)
//! Swinging  -> Jumping   (jump requested)
//! any       -> Grappling | Swinging          (ability request event)
//! ```

mod falling;
mod grappling;
mod grounded;
mod jumping;
mod machine;
mod motion;
mod swinging;

use std::ops::BitOr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{BrushId, CollisionLayers, CollisionWorld};
use crate::forces::StateMultipliers;

use super::buffer::InputBuffer;
use super::config::{GrappleAbility, MovementConfig, SwingAbility};
use super::gravity::ActionSet;
use super::ground::GroundContact;
use super::push_off::OverhangPushOff;
use super::state::{BodyForm, KinematicActor};

pub use falling::FallingState;
pub use grappling::GrapplingState;
pub use grounded::GroundedState;
pub use jumping::JumpingState;
pub use machine::{LocomotionStateMachine, Transition};
pub use swinging::SwingingState;

/// Discriminant of the active state, for animation and audio hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateTag {
    Grounded,
    Falling,
    Jumping,
    Grappling,
    Swinging,
}

// ============================================================================
// Events
// ============================================================================

/// Launch toward a grapple point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrappleRequest {
    pub target: Vec3,
    pub ability: GrappleAbility,
}

/// Attach to a swing anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingRequest {
    pub pivot: Vec3,
    pub ability: SwingAbility,
}

/// The actor changed body and uses `actions` from now on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformChange {
    pub form: BodyForm,
    pub actions: ActionSet,
}

/// A contact reported by the resolver on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionNotice {
    pub point: Vec3,
    pub normal: Vec3,
    pub brush: Option<BrushId>,
    pub layers: CollisionLayers,
}

/// Asynchronous input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocomotionEvent {
    GrappleRequested(GrappleRequest),
    SwingRequested(SwingRequest),
    TransformChanged(TransformChange),
    CollisionDetected(CollisionNotice),
}

impl LocomotionEvent {
    /// Subscription bit this event is delivered under.
    pub fn kind(&self) -> Subscriptions {
        match self {
            LocomotionEvent::GrappleRequested(_) => Subscriptions::GRAPPLE,
            LocomotionEvent::SwingRequested(_) => Subscriptions::SWING,
            LocomotionEvent::TransformChanged(_) => Subscriptions::TRANSFORM,
            LocomotionEvent::CollisionDetected(_) => Subscriptions::COLLISION,
        }
    }
}

/// Set of event kinds a state listens to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscriptions(pub u8);

impl Subscriptions {
    pub const NONE: Self = Self(0);
    pub const GRAPPLE: Self = Self(1 << 0);
    pub const SWING: Self = Self(1 << 1);
    pub const TRANSFORM: Self = Self(1 << 2);
    pub const COLLISION: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && (self.0 & other.0) == other.0
    }
}

impl BitOr for Subscriptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NextState {
    Grounded,
    Falling,
    Jumping,
    Grappling(GrappleRequest),
    Swinging(SwingRequest),
}

impl NextState {
    pub fn tag(&self) -> StateTag {
        match self {
            NextState::Grounded => StateTag::Grounded,
            NextState::Falling => StateTag::Falling,
            NextState::Jumping => StateTag::Jumping,
            NextState::Grappling(_) => StateTag::Grappling,
            NextState::Swinging(_) => StateTag::Swinging,
        }
    }
}

// ============================================================================
// State interface
// ============================================================================

/// Everything a state may read or write during one hook call.
pub(crate) struct StateContext<'a> {
    pub actor: &'a mut KinematicActor,
    pub input: &'a mut InputBuffer,
    /// Action set of the current body form.
    pub actions: &'a mut ActionSet,
    pub ground: GroundContact,
    pub move_axis: f32,
    pub world: &'a CollisionWorld,
    pub config: &'a MovementConfig,
    pub push_off: Option<&'a OverhangPushOff>,
    /// Summed external force for this tick, before the state multiplier.
    pub external_force: Vec3,
    pub multipliers: StateMultipliers,
    pub delta_time: f32,
    pub delta_time_ms: u32,
}

/// The narrow interface every locomotion state implements.
pub(crate) trait Locomotion {
    fn tag(&self) -> StateTag;

    /// Events delivered to this state while it is active.
    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::NONE
    }

    /// Called once on entry. Returning a state rejects the entry and
    /// redirects there instead; no exit hook runs for a rejected entry.
    fn on_enter(&mut self, _ctx: &mut StateContext) -> Option<NextState> {
        None
    }

    /// Per-tick physics: gravity, input forces, external forces.
    fn on_fixed_update(&mut self, ctx: &mut StateContext);

    /// Handle a subscribed event, optionally requesting a transition.
    fn on_event(&mut self, _ctx: &mut StateContext, _event: &LocomotionEvent) -> Option<NextState> {
        None
    }

    /// Polled transition rules, evaluated after the event queue drains.
    fn next_state(&self, ctx: &StateContext) -> Option<NextState>;

    fn on_exit(&mut self, _ctx: &mut StateContext) {}
}

/// The active state and its data.
#[derive(Debug, Clone, PartialEq)]
pub enum LocomotionState {
    Grounded(GroundedState),
    Falling(FallingState),
    Jumping(JumpingState),
    Grappling(GrapplingState),
    Swinging(SwingingState),
}

impl LocomotionState {
    /// Build the (not yet entered) state for a transition target.
    pub(crate) fn build(next: NextState, actions: ActionSet) -> Self {
        match next {
            NextState::Grounded => LocomotionState::Grounded(GroundedState::new(actions)),
            NextState::Falling => LocomotionState::Falling(FallingState::new(actions)),
            NextState::Jumping => LocomotionState::Jumping(JumpingState::new(actions)),
            NextState::Grappling(request) => {
                LocomotionState::Grappling(GrapplingState::new(actions, request))
            }
            NextState::Swinging(request) => {
                LocomotionState::Swinging(SwingingState::new(actions, request))
            }
        }
    }

    pub fn tag(&self) -> StateTag {
        self.as_locomotion().tag()
    }

    pub(crate) fn as_locomotion(&self) -> &dyn Locomotion {
        match self {
            LocomotionState::Grounded(state) => state,
            LocomotionState::Falling(state) => state,
            LocomotionState::Jumping(state) => state,
            LocomotionState::Grappling(state) => state,
            LocomotionState::Swinging(state) => state,
        }
    }

    pub(crate) fn as_locomotion_mut(&mut self) -> &mut dyn Locomotion {
        match self {
            LocomotionState::Grounded(state) => state,
            LocomotionState::Falling(state) => state,
            LocomotionState::Jumping(state) => state,
            LocomotionState::Grappling(state) => state,
            LocomotionState::Swinging(state) => state,
        }
    }
}

/// Where an ability state hands control back to once it is done.
pub(crate) fn resolution_state(ctx: &StateContext) -> NextState {
    if ctx.input.wants_jump() {
        NextState::Jumping
    } else if ctx.ground.is_grounded {
        NextState::Grounded
    } else {
        NextState::Falling
    }
}
