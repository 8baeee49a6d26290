//! Hanging from a swing anchor.

use crate::collision::CollisionLayers;
use crate::movement::gravity::ActionSet;
use crate::trajectory::Pendulum;

use super::{
    motion, resolution_state, Locomotion, LocomotionEvent, NextState, StateContext, StateTag,
    Subscriptions, SwingRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SwingingState {
    actions: ActionSet,
    request: SwingRequest,
    pendulum: Option<Pendulum>,
}

impl SwingingState {
    pub fn new(actions: ActionSet, request: SwingRequest) -> Self {
        Self {
            actions,
            request,
            pendulum: None,
        }
    }

    pub fn request(&self) -> &SwingRequest {
        &self.request
    }

    /// The rope, once attached.
    pub fn pendulum(&self) -> Option<&Pendulum> {
        self.pendulum.as_ref()
    }

    fn attach(&self, ctx: &StateContext) -> Option<Pendulum> {
        let origin = ctx.actor.position;
        let to_pivot = self.request.pivot - origin;
        let distance = to_pivot.length();

        if distance > self.request.ability.max_distance {
            log::warn!("swing anchor {:?} out of range", self.request.pivot);
            return None;
        }

        let reach = distance + ctx.config.physics.skin_width;
        if !ctx
            .world
            .raycast(origin, to_pivot, reach, CollisionLayers::SWING)
            .hit_something()
        {
            log::warn!("swing anchor {:?} has no line of sight", self.request.pivot);
            return None;
        }

        let pendulum = Pendulum::attach(origin, self.request.pivot);
        if pendulum.is_none() {
            log::warn!("swing rope too short at {:?}", self.request.pivot);
        }
        pendulum
    }
}

impl Locomotion for SwingingState {
    fn tag(&self) -> StateTag {
        StateTag::Swinging
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::GRAPPLE
    }

    fn on_enter(&mut self, ctx: &mut StateContext) -> Option<NextState> {
        ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;

        let Some(pendulum) = self.attach(ctx) else {
            return Some(resolution_state(ctx));
        };

        ctx.actor.velocity = pendulum.project_to_tangent(ctx.actor.position, ctx.actor.velocity);
        self.pendulum = Some(pendulum);

        log::debug!(
            "swing attached at {:?}, rope {:.2}",
            pendulum.pivot,
            pendulum.rest_length
        );
        None
    }

    fn on_fixed_update(&mut self, ctx: &mut StateContext) {
        let Some(pendulum) = self.pendulum else {
            return;
        };

        ctx.actor.velocity = pendulum.step(
            ctx.actor.position,
            ctx.actor.velocity,
            ctx.actor.gravity,
            ctx.move_axis,
            &self.request.ability,
            ctx.delta_time,
        );

        motion::apply_external_force(ctx, StateTag::Swinging);

        ctx.actor.velocity =
            pendulum.constrain(ctx.actor.position, ctx.actor.velocity, ctx.delta_time);
    }

    fn on_event(&mut self, _ctx: &mut StateContext, event: &LocomotionEvent) -> Option<NextState> {
        match event {
            LocomotionEvent::GrappleRequested(request) => Some(NextState::Grappling(*request)),
            _ => None,
        }
    }

    fn next_state(&self, ctx: &StateContext) -> Option<NextState> {
        ctx.input.wants_jump().then_some(NextState::Jumping)
    }
}
