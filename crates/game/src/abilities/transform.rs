//! Ball-form transform toggle.

use lilypad_physics::movement::TransformChange;
use lilypad_physics::{BodyForm, LocomotionEvent};

use super::AbilityContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformHandler {
    form: BodyForm,
    cooldown_ms: u32,
}

impl TransformHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> BodyForm {
        self.form
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_ms > 0
    }

    /// Toggle the body. The cooldown starts when reverting.
    pub fn press(&mut self, ctx: &mut AbilityContext<'_>) {
        if self.is_cooling_down() {
            log::debug!("transform ignored, {}ms of cooldown left", self.cooldown_ms);
            return;
        }

        let change = match self.form {
            BodyForm::Base => match ctx.config.transform.actions() {
                Ok(actions) => TransformChange {
                    form: BodyForm::Transformed,
                    actions,
                },
                Err(err) => {
                    log::warn!("transform disabled: {}", err);
                    return;
                }
            },
            BodyForm::Transformed => {
                self.cooldown_ms = ctx.config.transform.cooldown_ms;
                TransformChange {
                    form: BodyForm::Base,
                    actions: *ctx.base_actions,
                }
            }
        };

        log::debug!("transform to {:?}", change.form);
        self.form = change.form;
        ctx.movement.push_event(LocomotionEvent::TransformChanged(change));
    }

    pub fn update(&mut self, ctx: &mut AbilityContext<'_>) {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(ctx.delta_time_ms);
    }
}
