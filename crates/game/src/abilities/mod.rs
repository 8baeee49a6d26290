//! Traversal abilities.
//!
//! Each ability button routes to one handler:
//!
//! - **Grapple** / **Swing**: [`TetherHandler`] raycasts along the tongue
//!   and, after a wind-up, asks the locomotion state machine to launch or
//!   attach
//! - **Suction**: [`SuctionThrowController`] pulls throwable bodies in with
//!   the tongue, carries one and throws it
//! - **Transform**: [`TransformHandler`] toggles the ball body
//!
//! Only one ability is active at a time. Pressing a different button
//! releases the active ability first.

mod suction;
mod tether;
mod transform;

pub use suction::{SuctionPhase, SuctionThrowController};
pub use tether::{TetherHandler, TetherKind};
pub use transform::TransformHandler;

use lilypad_physics::{ActionSet, CollisionWorld, MovementState};
use serde::{Deserialize, Serialize};

use crate::bodies::BodySet;
use crate::config::AbilityConfig;
use crate::input::{ButtonPhase, InputRouter};
use crate::tongue::Tongue;

/// Ability button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityId {
    Grapple,
    Swing,
    Suction,
    Transform,
}

impl AbilityId {
    pub const ALL: [AbilityId; 4] = [
        AbilityId::Grapple,
        AbilityId::Swing,
        AbilityId::Suction,
        AbilityId::Transform,
    ];
}

/// Everything an ability may read or change during a tick.
pub struct AbilityContext<'a> {
    pub world: &'a CollisionWorld,
    pub movement: &'a mut MovementState,
    pub tongue: &'a mut Tongue,
    pub bodies: &'a mut BodySet,
    pub router: &'a mut InputRouter,
    pub config: &'a AbilityConfig,

    /// Actions of the untransformed body.
    pub base_actions: &'a ActionSet,

    /// Gravity on dynamic bodies (negative is down).
    pub world_gravity: f32,
    pub delta_time: f32,
    pub delta_time_ms: u32,
}

/// Owns the ability handlers and tracks which one is active.
#[derive(Debug, Clone)]
pub struct AbilityUser {
    active: Option<AbilityId>,
    pub grapple: TetherHandler,
    pub swing: TetherHandler,
    pub suction: SuctionThrowController,
    pub transform: TransformHandler,
}

impl Default for AbilityUser {
    fn default() -> Self {
        Self::new()
    }
}

impl AbilityUser {
    pub fn new() -> Self {
        Self {
            active: None,
            grapple: TetherHandler::new(TetherKind::Grapple),
            swing: TetherHandler::new(TetherKind::Swing),
            suction: SuctionThrowController::new(),
            transform: TransformHandler::new(),
        }
    }

    /// The ability whose button is down.
    pub fn active(&self) -> Option<AbilityId> {
        self.active
    }

    /// Route one button edge.
    pub fn handle(&mut self, ctx: &mut AbilityContext<'_>, id: AbilityId, phase: ButtonPhase) {
        match phase {
            ButtonPhase::Pressed => {
                if let Some(previous) = self.active.filter(|&active| active != id) {
                    log::debug!("{:?} pressed, releasing {:?}", id, previous);
                    self.release(ctx, previous);
                }
                self.active = Some(id);
                self.press(ctx, id);
            }
            ButtonPhase::Held => {}
            ButtonPhase::Released => {
                // Already released when another ability took over
                if self.active == Some(id) {
                    self.active = None;
                    self.release(ctx, id);
                }
            }
        }
    }

    /// Advance every handler's timers.
    pub fn update(&mut self, ctx: &mut AbilityContext<'_>) {
        self.grapple.update(ctx);
        self.swing.update(ctx);
        self.transform.update(ctx);
        self.suction.update(ctx);
    }

    fn press(&mut self, ctx: &mut AbilityContext<'_>, id: AbilityId) {
        match id {
            AbilityId::Grapple => self.grapple.press(ctx),
            AbilityId::Swing => self.swing.press(ctx),
            AbilityId::Suction => self.suction.press(ctx),
            AbilityId::Transform => self.transform.press(ctx),
        }
    }

    fn release(&mut self, ctx: &mut AbilityContext<'_>, id: AbilityId) {
        match id {
            AbilityId::Suction => self.suction.release(ctx),
            // Tethers and the transform act on press only
            AbilityId::Grapple | AbilityId::Swing | AbilityId::Transform => {}
        }
    }
}
