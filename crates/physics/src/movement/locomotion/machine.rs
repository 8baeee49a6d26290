//! State machine driver.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{LocomotionEvent, LocomotionState, NextState, StateContext, StateTag, Subscriptions};

/// Entry redirects allowed in one transition before forcing `Falling`.
const MAX_REDIRECTS: usize = 4;

/// One applied state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateTag,
    pub to: StateTag,
}

/// Owns the active state and its event subscriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionStateMachine {
    current: LocomotionState,
    subscriptions: Subscriptions,
}

impl LocomotionStateMachine {
    /// Enter `initial` and return the running machine.
    pub(crate) fn start(ctx: &mut StateContext, initial: NextState) -> Self {
        let mut machine = Self {
            current: LocomotionState::build(initial, *ctx.actions),
            subscriptions: Subscriptions::NONE,
        };
        let mut ignored = Vec::new();
        machine.enter(ctx, initial, &mut ignored);
        machine
    }

    pub fn tag(&self) -> StateTag {
        self.current.tag()
    }

    pub fn current(&self) -> &LocomotionState {
        &self.current
    }

    /// Event kinds currently delivered.
    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    pub(crate) fn fixed_update(&mut self, ctx: &mut StateContext) {
        self.current.as_locomotion_mut().on_fixed_update(ctx);
    }

    /// Deliver queued events to the active state.
    ///
    /// Body transforms always update the actor's form and action set, even
    /// when the active state does not listen for them.
    pub(crate) fn dispatch(
        &mut self,
        ctx: &mut StateContext,
        events: &mut VecDeque<LocomotionEvent>,
        transitions: &mut Vec<Transition>,
    ) {
        while let Some(event) = events.pop_front() {
            if let LocomotionEvent::TransformChanged(change) = &event {
                ctx.actor.form = change.form;
                *ctx.actions = change.actions;
            }

            if !self.subscriptions.contains(event.kind()) {
                log::trace!("{:?} ignores {:?}", self.tag(), event.kind());
                continue;
            }

            if let Some(next) = self.current.as_locomotion_mut().on_event(ctx, &event) {
                self.transition_to(ctx, next, transitions);
            }
        }
    }

    /// Apply the active state's polled transition rule, if any.
    pub(crate) fn evaluate(&mut self, ctx: &mut StateContext, transitions: &mut Vec<Transition>) {
        if let Some(next) = self.current.as_locomotion().next_state(ctx) {
            self.transition_to(ctx, next, transitions);
        }
    }

    fn transition_to(
        &mut self,
        ctx: &mut StateContext,
        next: NextState,
        transitions: &mut Vec<Transition>,
    ) {
        self.subscriptions = Subscriptions::NONE;
        self.current.as_locomotion_mut().on_exit(ctx);
        self.enter(ctx, next, transitions);
    }

    fn enter(
        &mut self,
        ctx: &mut StateContext,
        mut next: NextState,
        transitions: &mut Vec<Transition>,
    ) {
        let from = self.current.tag();
        let mut redirects = 0;

        loop {
            let mut state = LocomotionState::build(next, *ctx.actions);
            match state.as_locomotion_mut().on_enter(ctx) {
                Some(redirect) => {
                    redirects += 1;
                    log::debug!(
                        "{:?} rejected entry, redirecting to {:?}",
                        next.tag(),
                        redirect.tag()
                    );
                    next = if redirects > MAX_REDIRECTS {
                        log::warn!("entry redirect limit reached, falling");
                        NextState::Falling
                    } else {
                        redirect
                    };
                }
                None => {
                    log::debug!("locomotion {:?} -> {:?}", from, state.tag());
                    self.subscriptions = state.as_locomotion().subscriptions();
                    transitions.push(Transition {
                        from,
                        to: state.tag(),
                    });
                    self.current = state;
                    return;
                }
            }
        }
    }
}
