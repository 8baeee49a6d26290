//! Shared movement steps for the ground and air states.

use glam::{Vec2, Vec3};

use crate::movement::config::MoveAction;
use crate::movement::state::{BodyForm, KinematicActor};

use super::{StateContext, StateTag};

pub(super) fn apply_gravity(actor: &mut KinematicActor, delta_time: f32) {
    actor.velocity.y += actor.gravity * delta_time;
}

/// Snap lateral velocity to the input target.
fn apply_precision(actor: &mut KinematicActor, action: &MoveAction, axis: f32) {
    actor.velocity.x = axis * action.max_horizontal_speed;
}

/// Close on the input target, using deceleration when counter-strafing.
fn apply_momentum(
    actor: &mut KinematicActor,
    action: &MoveAction,
    axis: f32,
    threshold: f32,
    delta_time: f32,
) {
    if axis.abs() <= threshold {
        return;
    }

    let target = axis * action.max_horizontal_speed;
    let difference = target - actor.velocity.x;
    let counter_strafing = (axis > threshold && actor.velocity.x < 0.0)
        || (axis < -threshold && actor.velocity.x > 0.0);
    let rate = if counter_strafing {
        action.deceleration
    } else {
        action.acceleration
    };

    actor.velocity.x += difference * rate * delta_time;
}

/// Bleed lateral speed when there is no input.
fn apply_friction(
    actor: &mut KinematicActor,
    action: &MoveAction,
    axis: f32,
    threshold: f32,
    delta_time: f32,
) {
    if axis.abs() >= threshold {
        return;
    }

    if actor.velocity.x.abs() < threshold {
        actor.velocity.x = 0.0;
        return;
    }

    let delta = action.ground_friction * delta_time;
    if actor.velocity.x > 0.0 {
        actor.velocity.x = (actor.velocity.x - delta).max(0.0);
    } else {
        actor.velocity.x = (actor.velocity.x + delta).min(0.0);
    }
}

fn clamp_velocity(actor: &mut KinematicActor, action: &MoveAction) {
    actor.velocity.x = actor
        .velocity
        .x
        .clamp(-action.max_horizontal_speed, action.max_horizontal_speed);
    actor.velocity.y = actor
        .velocity
        .y
        .clamp(-action.max_vertical_speed, action.max_vertical_speed);
}

/// Scaled external force for the active state.
pub(super) fn apply_external_force(ctx: &mut StateContext, state: StateTag) {
    let weight = ctx.multipliers.for_state(state);
    let force = ctx.external_force * weight * ctx.delta_time;
    ctx.actor.velocity += Vec2::new(force.x, force.y);
}

fn apply_push_off(ctx: &mut StateContext) {
    if ctx.actor.form == BodyForm::Transformed {
        return;
    }

    let Some(push_off) = ctx.push_off else {
        return;
    };

    let (position, vertical_speed) = (ctx.actor.position, ctx.actor.velocity.y);
    if let Some(dx) = push_off.push_off(ctx.world, position, vertical_speed, ctx.delta_time) {
        log::debug!("overhang push-off {:+.2}", dx);
        ctx.actor.position += Vec3::new(dx, 0.0, 0.0);
    }
}

/// Gravity, lateral input, clamp and push-off, in that order.
pub(super) fn standard_movement(ctx: &mut StateContext, action: &MoveAction) {
    let threshold = ctx.config.physics.float_precision_threshold;
    let axis = ctx.move_axis;
    let dt = ctx.delta_time;

    apply_gravity(ctx.actor, dt);

    if action.precision_movement {
        apply_precision(ctx.actor, action, axis);
    } else {
        apply_momentum(ctx.actor, action, axis, threshold, dt);
        apply_friction(ctx.actor, action, axis, threshold, dt);
    }

    clamp_velocity(ctx.actor, action);
    apply_push_off(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    #[test]
    fn test_momentum_closes_on_target() {
        let action = MoveAction::default();
        let mut actor = KinematicActor::new(Vec3::ZERO);

        apply_momentum(&mut actor, &action, 1.0, 0.01, DT);
        assert!((actor.velocity.x - 7.0 * 5.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn test_counter_strafe_uses_deceleration() {
        let action = MoveAction::default();
        let mut actor = KinematicActor::new(Vec3::ZERO);
        actor.velocity.x = 7.0;

        apply_momentum(&mut actor, &action, -1.0, 0.01, DT);
        assert!((actor.velocity.x - (7.0 - 14.0 * 10.0 * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_friction_never_reverses() {
        let action = MoveAction::default();
        let mut actor = KinematicActor::new(Vec3::ZERO);
        actor.velocity.x = -0.05;

        apply_friction(&mut actor, &action, 0.0, 0.01, DT);
        assert_eq!(actor.velocity.x, 0.0);

        actor.velocity.x = 3.0;
        apply_friction(&mut actor, &action, 0.0, 0.01, DT);
        assert!((actor.velocity.x - 2.9).abs() < 1e-5);

        apply_friction(&mut actor, &action, 1.0, 0.01, DT);
        assert!((actor.velocity.x - 2.9).abs() < 1e-5, "Input disables friction");
    }

    #[test]
    fn test_precision_and_clamp() {
        let action = MoveAction::default();
        let mut actor = KinematicActor::new(Vec3::ZERO);

        apply_precision(&mut actor, &action, -0.5);
        assert_eq!(actor.velocity.x, -3.5);

        actor.velocity = Vec2::new(100.0, -100.0);
        clamp_velocity(&mut actor, &action);
        assert_eq!(actor.velocity, Vec2::new(7.0, -50.0));
    }
}
