//! Flying along a grapple arc.
//!
//! On entry the target is validated (range plus a grapple-surface ray) and
//! the launch velocity is solved from [`GrappleArc`]. From there the actor
//! flies ballistically; the first contact after the ignore window ends the
//! grapple.

use crate::collision::CollisionLayers;
use crate::movement::gravity::ActionSet;
use crate::trajectory::GrappleArc;

use super::{
    motion, resolution_state, GrappleRequest, Locomotion, LocomotionEvent, NextState, StateContext,
    StateTag, Subscriptions,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GrapplingState {
    actions: ActionSet,
    request: GrappleRequest,
    arc: Option<GrappleArc>,
    elapsed_ms: u32,
}

impl GrapplingState {
    pub fn new(actions: ActionSet, request: GrappleRequest) -> Self {
        Self {
            actions,
            request,
            arc: None,
            elapsed_ms: 0,
        }
    }

    pub fn request(&self) -> &GrappleRequest {
        &self.request
    }

    /// The solved launch arc, once entered.
    pub fn arc(&self) -> Option<&GrappleArc> {
        self.arc.as_ref()
    }

    fn target_reachable(&self, ctx: &StateContext) -> bool {
        let origin = ctx.actor.position;
        let to_target = self.request.target - origin;
        let distance = to_target.length();

        if distance > self.request.ability.max_distance {
            log::warn!(
                "grapple target {:?} out of range ({:.2} > {:.2})",
                self.request.target,
                distance,
                self.request.ability.max_distance
            );
            return false;
        }

        let reach = distance + ctx.config.physics.skin_width;
        let hit = ctx.world.raycast(origin, to_target, reach, CollisionLayers::GRAPPLE);
        if !hit.hit_something() {
            log::warn!("grapple target {:?} has no line of sight", self.request.target);
            return false;
        }

        true
    }
}

impl Locomotion for GrapplingState {
    fn tag(&self) -> StateTag {
        StateTag::Grappling
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::GRAPPLE | Subscriptions::SWING | Subscriptions::COLLISION
    }

    fn on_enter(&mut self, ctx: &mut StateContext) -> Option<NextState> {
        if !self.target_reachable(ctx) {
            return Some(resolution_state(ctx));
        }

        let arc = GrappleArc::solve(
            ctx.actor.position,
            self.request.target,
            self.request.ability.overshoot_height,
            &self.actions.gravity,
        );

        ctx.actor.gravity = self.actions.gravity.ascend_gravity;
        ctx.actor.velocity = arc.launch_velocity();
        self.arc = Some(arc);
        self.elapsed_ms = 0;

        log::debug!(
            "grapple launch toward {:?} with {:?}",
            self.request.target,
            ctx.actor.velocity
        );
        None
    }

    fn on_fixed_update(&mut self, ctx: &mut StateContext) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(ctx.delta_time_ms);

        if ctx.actor.velocity.y <= 0.0 {
            ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;
        }

        motion::apply_gravity(ctx.actor, ctx.delta_time);
        motion::apply_external_force(ctx, StateTag::Grappling);
    }

    fn on_event(&mut self, ctx: &mut StateContext, event: &LocomotionEvent) -> Option<NextState> {
        match event {
            LocomotionEvent::GrappleRequested(request) => Some(NextState::Grappling(*request)),
            LocomotionEvent::SwingRequested(request) => Some(NextState::Swinging(*request)),
            LocomotionEvent::CollisionDetected(notice) => {
                if self.elapsed_ms < ctx.config.physics.grapple_ignore_ms {
                    return None;
                }
                log::debug!("grapple ended by contact at {:?}", notice.point);
                Some(resolution_state(ctx))
            }
            LocomotionEvent::TransformChanged(_) => None,
        }
    }

    fn next_state(&self, _ctx: &StateContext) -> Option<NextState> {
        None
    }
}
