//! Standing or walking on walkable ground.

use crate::movement::gravity::ActionSet;

use super::{motion, Locomotion, LocomotionEvent, NextState, StateContext, StateTag, Subscriptions};

#[derive(Debug, Clone, PartialEq)]
pub struct GroundedState {
    actions: ActionSet,
}

impl GroundedState {
    pub fn new(actions: ActionSet) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }
}

impl Locomotion for GroundedState {
    fn tag(&self) -> StateTag {
        StateTag::Grounded
    }

    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::GRAPPLE | Subscriptions::SWING | Subscriptions::TRANSFORM
    }

    fn on_enter(&mut self, ctx: &mut StateContext) -> Option<NextState> {
        // Keeps the actor pressed into the ground so slopes stay attached
        ctx.actor.gravity = self.actions.gravity.fast_fall_gravity;
        None
    }

    fn on_fixed_update(&mut self, ctx: &mut StateContext) {
        motion::standard_movement(ctx, &self.actions.move_action);
        motion::apply_external_force(ctx, StateTag::Grounded);
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
        if ctx.input.wants_jump() {
            Some(NextState::Jumping)
        } else if !ctx.ground.is_grounded {
            Some(NextState::Falling)
        } else {
            None
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        ctx.input.clear_jump_flags();
    }
}
