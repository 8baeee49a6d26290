//! Rising from a jump.
//!
//! Ascend gravity applies while the button is held and the actor is still
//! rising. Releasing early or passing the apex switches to fast-fall
//! gravity for the rest of the state.

use crate::movement::gravity::ActionSet;

use super::{motion, Locomotion, LocomotionEvent, NextState, StateContext, StateTag, Subscriptions};

#[derive(Debug, Clone, PartialEq)]
pub struct JumpingState {
    actions: ActionSet,
    fast_falling: bool,
}

impl JumpingState {
    pub fn new(actions: ActionSet) -> Self {
        Self {
            actions,
            fast_falling: false,
        }
    }

    pub fn is_fast_falling(&self) -> bool {
        self.fast_falling
    }
}

impl Locomotion for JumpingState {
    fn tag(&self) -> StateTag {
        StateTag::Jumping
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::GRAPPLE | Subscriptions::SWING | Subscriptions::TRANSFORM
    }

    fn on_enter(&mut self, ctx: &mut StateContext) -> Option<NextState> {
        ctx.actor.gravity = self.actions.gravity.ascend_gravity;
        ctx.actor.velocity.y = self.actions.gravity.initial_jump_speed;
        ctx.input.clear_buffers();
        None
    }

    fn on_fixed_update(&mut self, ctx: &mut StateContext) {
        if !self.fast_falling && (!ctx.input.jump_held() || ctx.actor.velocity.y <= 0.0) {
            self.fast_falling = true;
            ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;
        }

        motion::standard_movement(ctx, &self.actions.move_action);
        motion::apply_external_force(ctx, StateTag::Jumping);
    }

    fn on_event(&mut self, ctx: &mut StateContext, event: &LocomotionEvent) -> Option<NextState> {
        match event {
            LocomotionEvent::GrappleRequested(request) => Some(NextState::Grappling(*request)),
            LocomotionEvent::SwingRequested(request) => Some(NextState::Swinging(*request)),
            LocomotionEvent::TransformChanged(change) => {
                self.actions = change.actions;
                ctx.actor.gravity = if self.fast_falling {
                    self.actions.gravity.fast_fall_gravity
                } else {
                    self.actions.gravity.ascend_gravity
                };
                None
            }
            LocomotionEvent::CollisionDetected(_) => None,
        }
    }

    fn next_state(&self, ctx: &StateContext) -> Option<NextState> {
        (ctx.actor.velocity.y <= 0.0).then_some(NextState::Falling)
    }
}
