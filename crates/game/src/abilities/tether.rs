//! Grapple and swing handlers.
//!
//! A press casts a ray along the tongue. If it lands on a grapple (or
//! swing) surface, input freezes for the ability's delay while the tongue
//! shoots out, then the locomotion request is queued. A miss still freezes
//! input but requests nothing. The cooldown starts on every accepted press.

use glam::Vec3;
use lilypad_physics::movement::{GrappleRequest, SwingRequest};
use lilypad_physics::{CollisionLayers, LocomotionEvent};

use super::AbilityContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetherKind {
    Grapple,
    Swing,
}

impl TetherKind {
    fn layer(self) -> CollisionLayers {
        match self {
            TetherKind::Grapple => CollisionLayers::GRAPPLE,
            TetherKind::Swing => CollisionLayers::SWING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTether {
    anchor: Vec3,
    remaining_ms: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TetherHandler {
    kind: TetherKind,
    cooldown_ms: u32,
    pending: Option<PendingTether>,
}

impl TetherHandler {
    pub fn new(kind: TetherKind) -> Self {
        Self {
            kind,
            cooldown_ms: 0,
            pending: None,
        }
    }

    pub fn kind(&self) -> TetherKind {
        self.kind
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_ms > 0
    }

    /// An anchor was found and the request is waiting out the delay.
    pub fn pending_anchor(&self) -> Option<Vec3> {
        self.pending.map(|pending| pending.anchor)
    }

    pub fn press(&mut self, ctx: &mut AbilityContext<'_>) {
        if self.is_cooling_down() {
            log::debug!("{:?} ignored, {}ms of cooldown left", self.kind, self.cooldown_ms);
            return;
        }

        let (max_distance, cooldown_ms, delay_ms) = match self.kind {
            TetherKind::Grapple => {
                let ability = &ctx.config.grapple;
                (ability.max_distance, ability.cooldown_ms, ability.delay_ms)
            }
            TetherKind::Swing => {
                let ability = &ctx.config.swing;
                (ability.max_distance, ability.cooldown_ms, ability.delay_ms)
            }
        };

        self.cooldown_ms = cooldown_ms;
        ctx.router.freeze(delay_ms);

        // World geometry blocks the ray; only the ability's own layer anchors
        let layer = self.kind.layer();
        let origin = ctx.movement.position();
        let hit = ctx.world.raycast(
            origin,
            ctx.tongue.direction(),
            max_distance,
            layer | CollisionLayers::WORLD,
        );

        match hit.hit_point {
            Some(anchor) if hit.hit_layers.intersects(layer) => {
                log::debug!("{:?} anchor at {:?}, launching in {}ms", self.kind, anchor, delay_ms);
                ctx.tongue.extend(anchor, delay_ms as f32 / 1000.0);
                self.pending = Some(PendingTether {
                    anchor,
                    remaining_ms: delay_ms,
                });
            }
            _ => log::debug!("{:?} found no anchor within {}m", self.kind, max_distance),
        }
    }

    /// Count down the cooldown and fire a pending request once its delay
    /// has passed.
    pub fn update(&mut self, ctx: &mut AbilityContext<'_>) {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(ctx.delta_time_ms);

        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        pending.remaining_ms = pending.remaining_ms.saturating_sub(ctx.delta_time_ms);
        if pending.remaining_ms > 0 {
            return;
        }

        let anchor = pending.anchor;
        self.pending = None;
        ctx.tongue.attach(anchor);

        let event = match self.kind {
            TetherKind::Grapple => LocomotionEvent::GrappleRequested(GrappleRequest {
                target: anchor,
                ability: ctx.config.grapple,
            }),
            TetherKind::Swing => LocomotionEvent::SwingRequested(SwingRequest {
                pivot: anchor,
                ability: ctx.config.swing,
            }),
        };
        ctx.movement.push_event(event);
    }
}
