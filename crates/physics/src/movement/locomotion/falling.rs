//! Airborne without an active jump.

use crate::movement::gravity::ActionSet;

use super::{motion, Locomotion, LocomotionEvent, NextState, StateContext, StateTag, Subscriptions};

#[derive(Debug, Clone, PartialEq)]
pub struct FallingState {
    actions: ActionSet,
}

impl FallingState {
    pub fn new(actions: ActionSet) -> Self {
        Self { actions }
    }
}

impl Locomotion for FallingState {
    fn tag(&self) -> StateTag {
        StateTag::Falling
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::GRAPPLE | Subscriptions::SWING | Subscriptions::TRANSFORM
    }

    fn on_enter(&mut self, ctx: &mut StateContext) -> Option<NextState> {
        ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;
        ctx.input.arm_coyote(&ctx.ground, &ctx.config.time);
        None
    }

    fn on_fixed_update(&mut self, ctx: &mut StateContext) {
        motion::standard_movement(ctx, &self.actions.move_action);
        motion::apply_external_force(ctx, StateTag::Falling);
    }

    fn on_event(&mut self, ctx: &mut StateContext, event: &LocomotionEvent) -> Option<NextState> {
        match event {
            LocomotionEvent::GrappleRequested(request) => Some(NextState::Grappling(*request)),
            LocomotionEvent::SwingRequested(request) => Some(NextState::Swinging(*request)),
            LocomotionEvent::TransformChanged(change) => {
                self.actions = change.actions;
                ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;
                None
            }
            LocomotionEvent::CollisionDetected(_) => None,
        }
    }

    fn next_state(&self, ctx: &StateContext) -> Option<NextState> {
        if ctx.ground.is_grounded {
            Some(NextState::Grounded)
        } else if ctx.input.coyote_buffered() && ctx.input.jump_requested() {
            Some(NextState::Jumping)
        } else {
            None
        }
    }
}
