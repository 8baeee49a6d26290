//! Suction and throw.
//!
//! Pressing shoots the tongue out along the aim line, stopping at the first
//! obstruction. While the button stays down, throwable bodies inside the
//! suction cone are pulled toward the mouth with gravity switched off; a
//! body that gets close enough to the mouth, or touches the tongue tip, is
//! caught and the tongue reels it in.
//!
//! A caught body rides the tongue tip. Releasing the button throws it once
//! it has been held for at least one tick, with a launch speed scaled by
//! how long it was held. Releasing while the tongue is still out just
//! reels it back.

use std::collections::BTreeSet;

use glam::Vec3;
use lilypad_physics::trajectory::throw_velocity;
use lilypad_physics::{CollisionLayers, ConeAttraction, ThrowArc};

use super::AbilityContext;
use crate::bodies::{BodyHandle, BodyId, BodySet};
use crate::config::SuctionAbility;
use crate::tongue::TongueMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuctionPhase {
    #[default]
    Idle,
    /// Tongue out, cone pulling.
    Extending,
    /// A body rides the tongue tip.
    Holding,
    /// Tongue coming back empty.
    Retracting,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuctionThrowController {
    phase: SuctionPhase,
    held: Option<BodyId>,
    hold_time: f32,
    ready_to_throw: bool,
    button_held: bool,

    /// Bodies with gravity switched off by the cone.
    suctioned: BTreeSet<BodyId>,

    /// Throw preview while holding.
    preview: Vec<Vec3>,
}

impl SuctionThrowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SuctionPhase {
        self.phase
    }

    pub fn held(&self) -> Option<BodyId> {
        self.held
    }

    pub fn hold_time(&self) -> f32 {
        self.hold_time
    }

    pub fn is_suctioning(&self, id: BodyId) -> bool {
        self.suctioned.contains(&id)
    }

    /// Points along the throw arc for the held body, empty otherwise.
    pub fn preview(&self) -> &[Vec3] {
        &self.preview
    }

    pub fn press(&mut self, ctx: &mut AbilityContext<'_>) {
        self.button_held = true;
        if self.held.is_some() || ctx.tongue.mode() != TongueMode::Aim {
            return;
        }

        let settings = &ctx.config.suction;
        let origin = ctx.tongue.origin();
        let direction = ctx.tongue.direction();
        let hit = ctx.world.raycast(
            origin,
            direction,
            settings.range,
            CollisionLayers::MASK_OBSTRUCTION,
        );
        let target = hit.hit_point.unwrap_or(origin + direction * settings.range);
        let duration = ctx.tongue.end_point().distance(target) / settings.extend_speed;

        if ctx.tongue.extend(target, duration) {
            log::debug!("suction extending to {:?}", target);
            self.phase = SuctionPhase::Extending;
        }
    }

    pub fn release(&mut self, ctx: &mut AbilityContext<'_>) {
        self.button_held = false;

        match self.phase {
            SuctionPhase::Extending => {
                self.release_suctioned(ctx.bodies);
                self.retract(ctx);
            }
            SuctionPhase::Holding => {
                if self.ready_to_throw {
                    self.throw(ctx);
                } else {
                    self.drop_held(ctx.bodies);
                }
                if ctx.tongue.mode() == TongueMode::Aim {
                    self.phase = SuctionPhase::Idle;
                } else {
                    self.retract(ctx);
                }
            }
            SuctionPhase::Idle | SuctionPhase::Retracting => {}
        }
    }

    pub fn update(&mut self, ctx: &mut AbilityContext<'_>) {
        match self.phase {
            SuctionPhase::Idle => {}
            SuctionPhase::Extending => self.update_extending(ctx),
            SuctionPhase::Holding => self.update_holding(ctx),
            SuctionPhase::Retracting => {
                if ctx.tongue.is_settled() {
                    ctx.tongue.aim();
                    self.phase = SuctionPhase::Idle;
                }
            }
        }

        self.update_preview(ctx);
    }

    fn update_extending(&mut self, ctx: &mut AbilityContext<'_>) {
        if self.button_held {
            if let Some(id) = self.attract(ctx) {
                self.catch(ctx, id);
                return;
            }
        }

        let arrived = ctx
            .tongue
            .target()
            .map_or(true, |target| ctx.tongue.is_tip_near(target, ctx.config.suction.tip_epsilon));
        if arrived && !self.button_held {
            self.release_suctioned(ctx.bodies);
            self.retract(ctx);
        }
    }

    fn update_holding(&mut self, ctx: &mut AbilityContext<'_>) {
        let Some(id) = self.held else {
            self.phase = SuctionPhase::Idle;
            return;
        };

        // Reeled all the way in: the tip goes back to following the aim
        if ctx.tongue.mode() == TongueMode::Extending && ctx.tongue.is_settled() {
            ctx.tongue.aim();
        }

        let tip = ctx.tongue.end_point();
        let drop_distance = ctx.config.suction.drop_distance;
        let Some(body) = ctx.bodies.get_mut(id) else {
            log::warn!("held body {} no longer exists", id);
            self.held = None;
            self.phase = SuctionPhase::Idle;
            return;
        };

        if body.position.distance(tip) >= drop_distance {
            log::debug!("body {} slipped off the tongue", id);
            self.drop_held(ctx.bodies);
            self.phase = if ctx.tongue.mode() == TongueMode::Aim {
                SuctionPhase::Idle
            } else {
                SuctionPhase::Retracting
            };
            return;
        }

        self.hold_time += ctx.delta_time;
        body.set_velocity(Vec3::ZERO);
        body.set_use_gravity(false);
        body.move_kinematic(tip);
        self.ready_to_throw = true;
    }

    /// Pull bodies in the cone toward the mouth.
    ///
    /// Returns the first body close enough to catch.
    fn attract(&mut self, ctx: &mut AbilityContext<'_>) -> Option<BodyId> {
        let settings = ctx.config.suction;
        let cone = ConeAttraction {
            range: settings.range,
            cone_angle: settings.cone_angle,
            max_force: settings.max_force,
        };
        let origin = ctx.tongue.origin();
        let axis = ctx.tongue.direction();
        let tip = ctx.tongue.end_point();

        let mut in_cone = BTreeSet::new();
        let mut caught = None;

        for body in ctx.bodies.iter_mut().filter(|body| body.is_throwable()) {
            if caught.is_none() && is_catchable(&settings, origin, tip, body.position, body.radius)
            {
                caught = Some(body.id);
            }

            let Some(force) = cone.force_on(origin, axis, body.position) else {
                continue;
            };

            let to_body = body.position - origin;
            let reach = to_body.length() - body.radius;
            let blocked = ctx
                .world
                .raycast(origin, to_body, reach, CollisionLayers::MASK_OBSTRUCTION)
                .hit_something();
            if blocked {
                continue;
            }

            body.set_use_gravity(false);
            body.apply_force(force, ctx.delta_time);
            in_cone.insert(body.id);
        }

        // Anything that left the cone falls again from rest
        for id in self.suctioned.difference(&in_cone) {
            if let Some(body) = ctx.bodies.get_mut(*id) {
                body.set_use_gravity(true);
                body.set_velocity(Vec3::ZERO);
            }
        }
        self.suctioned = in_cone;

        caught
    }

    fn catch(&mut self, ctx: &mut AbilityContext<'_>, id: BodyId) {
        self.suctioned.remove(&id);
        self.release_suctioned(ctx.bodies);

        if let Some(body) = ctx.bodies.get_mut(id) {
            body.set_velocity(Vec3::ZERO);
            body.set_use_gravity(false);
        }

        log::debug!("caught body {}", id);
        self.held = Some(id);
        self.hold_time = 0.0;
        self.ready_to_throw = false;
        self.phase = SuctionPhase::Holding;

        let home = ctx.tongue.home();
        let duration = ctx.tongue.end_point().distance(home) / ctx.config.suction.retract_speed;
        ctx.tongue.retract(home, duration);
    }

    fn throw(&mut self, ctx: &mut AbilityContext<'_>) {
        let Some(id) = self.held.take() else {
            return;
        };
        let hold_time = std::mem::take(&mut self.hold_time);
        self.ready_to_throw = false;

        let direction = ctx.tongue.direction();
        let Some(body) = ctx.bodies.get_mut(id) else {
            return;
        };
        body.set_use_gravity(true);

        match body.throwable {
            Some(throwable) => {
                let velocity = throw_velocity(
                    direction,
                    throwable.max_vertical_height,
                    ctx.world_gravity,
                    hold_time,
                    throwable.max_hold_time,
                );
                log::debug!("threw body {} at {:?}", id, velocity);
                body.apply_velocity_change(Vec3::new(velocity.x, velocity.y, 0.0));
            }
            None => log::warn!("held body {} is not throwable, dropping it", id),
        }
    }

    fn drop_held(&mut self, bodies: &mut BodySet) {
        if let Some(body) = self.held.take().and_then(|id| bodies.get_mut(id)) {
            body.set_use_gravity(true);
        }
        self.hold_time = 0.0;
        self.ready_to_throw = false;
    }

    fn release_suctioned(&mut self, bodies: &mut BodySet) {
        for id in std::mem::take(&mut self.suctioned) {
            if let Some(body) = bodies.get_mut(id) {
                body.set_use_gravity(true);
                body.set_velocity(Vec3::ZERO);
            }
        }
    }

    fn retract(&mut self, ctx: &mut AbilityContext<'_>) {
        let home = ctx.tongue.home();
        let duration = ctx.tongue.end_point().distance(home) / ctx.config.suction.retract_speed;
        if ctx.tongue.retract(home, duration) {
            self.phase = SuctionPhase::Retracting;
        } else {
            self.phase = SuctionPhase::Idle;
        }
    }

    fn update_preview(&mut self, ctx: &AbilityContext<'_>) {
        self.preview.clear();

        let Some(throwable) = self
            .held
            .and_then(|id| ctx.bodies.get(id))
            .and_then(|body| body.throwable)
        else {
            return;
        };

        let settings = &ctx.config.suction;
        let velocity = throw_velocity(
            ctx.tongue.direction(),
            throwable.max_vertical_height,
            ctx.world_gravity,
            self.hold_time,
            throwable.max_hold_time,
        );
        let arc = ThrowArc::new(ctx.tongue.end_point(), velocity, ctx.world_gravity);
        self.preview = arc.sample_points(
            ctx.world,
            settings.arc_points,
            settings.arc_time_step,
            CollisionLayers::MASK_OBSTRUCTION,
        );
    }
}

fn is_catchable(
    settings: &SuctionAbility,
    mouth: Vec3,
    tip: Vec3,
    body: Vec3,
    radius: f32,
) -> bool {
    body.distance(mouth) <= settings.capture_distance
        || body.distance(tip) <= settings.pickup_radius + radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Throwable;
    use crate::config::AbilityConfig;
    use crate::input::InputRouter;
    use crate::tongue::Tongue;
    use lilypad_physics::{ActionSet, CollisionWorld, MovementState, PlayerController};

    const MOUTH: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    /// Everything an ability context borrows, aimed along +X.
    struct TestRig {
        world: CollisionWorld,
        movement: MovementState,
        tongue: Tongue,
        bodies: BodySet,
        router: InputRouter,
        config: AbilityConfig,
        base_actions: ActionSet,
    }

    impl TestRig {
        fn new() -> Self {
            let world = CollisionWorld::new();
            let controller = PlayerController::with_default_config().unwrap();
            let movement = controller.spawn(MOUTH, &world);
            let mut tongue = Tongue::new(MOUTH, 2.0);
            tongue.point_at(MOUTH + Vec3::X);

            Self {
                world,
                movement,
                tongue,
                bodies: BodySet::new(),
                router: InputRouter::new(),
                config: AbilityConfig::default(),
                base_actions: *controller.base_actions(),
            }
        }

        fn add_throwable(&mut self, position: Vec3) -> BodyId {
            self.bodies.add(position, 0.25, Some(Throwable::default()))
        }

        fn ctx(&mut self) -> AbilityContext<'_> {
            AbilityContext {
                world: &self.world,
                movement: &mut self.movement,
                tongue: &mut self.tongue,
                bodies: &mut self.bodies,
                router: &mut self.router,
                config: &self.config,
                base_actions: &self.base_actions,
                world_gravity: -9.81,
                delta_time: 0.02,
                delta_time_ms: 20,
            }
        }
    }

    #[test]
    fn test_catch_by_mouth_or_tip() {
        let settings = SuctionAbility::default();
        let mouth = Vec3::ZERO;
        let tip = Vec3::new(5.0, 0.0, 0.0);

        assert!(is_catchable(&settings, mouth, tip, Vec3::new(1.5, 0.0, 0.0), 0.25));
        assert!(is_catchable(&settings, mouth, tip, Vec3::new(5.5, 0.0, 0.0), 0.25));
        assert!(!is_catchable(&settings, mouth, tip, Vec3::new(3.5, 0.0, 0.0), 0.25));
    }

    #[test]
    fn test_drop_restores_gravity() {
        let mut bodies = BodySet::new();
        let id = bodies.add(Vec3::ZERO, 0.25, Some(Throwable::default()));
        bodies.get_mut(id).unwrap().set_use_gravity(false);

        let mut suction = SuctionThrowController::new();
        suction.held = Some(id);
        suction.hold_time = 1.0;
        suction.drop_held(&mut bodies);

        assert!(suction.held().is_none());
        assert_eq!(suction.hold_time(), 0.0);
        assert!(bodies.get(id).unwrap().uses_gravity());
    }

    #[test]
    fn test_body_leaving_cone_falls_from_rest() {
        let mut rig = TestRig::new();
        let id = rig.add_throwable(MOUTH + Vec3::new(4.0, 0.0, 0.0));
        let mut suction = SuctionThrowController::new();

        suction.press(&mut rig.ctx());
        suction.update(&mut rig.ctx());

        assert_eq!(suction.phase(), SuctionPhase::Extending);
        assert!(suction.is_suctioning(id));
        let body = rig.bodies.get(id).unwrap();
        assert!(!body.uses_gravity(), "Cone switches gravity off");
        assert!(body.velocity.x < 0.0, "Pulled toward the mouth, v={:?}", body.velocity);

        // Behind the actor, outside the cone
        rig.bodies.get_mut(id).unwrap().position = MOUTH - Vec3::new(4.0, 0.0, 0.0);
        suction.update(&mut rig.ctx());

        assert!(!suction.is_suctioning(id));
        let body = rig.bodies.get(id).unwrap();
        assert!(body.uses_gravity());
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(suction.held().is_none());
    }

    #[test]
    fn test_held_body_drops_past_drop_distance() {
        let mut rig = TestRig::new();
        let id = rig.add_throwable(MOUTH + Vec3::new(1.5, 0.0, 0.0));
        let mut suction = SuctionThrowController::new();

        suction.press(&mut rig.ctx());
        suction.update(&mut rig.ctx());
        assert_eq!(suction.phase(), SuctionPhase::Holding);
        assert_eq!(suction.held(), Some(id));

        suction.update(&mut rig.ctx());
        assert_eq!(suction.held(), Some(id), "Body close to the tip stays held");
        assert!(!rig.bodies.get(id).unwrap().uses_gravity());

        let tip = rig.tongue.end_point();
        let drop_distance = rig.config.suction.drop_distance;
        let below_tip = tip - Vec3::new(0.0, drop_distance + 0.1, 0.0);
        rig.bodies.get_mut(id).unwrap().position = below_tip;
        suction.update(&mut rig.ctx());

        assert!(suction.held().is_none(), "Body past the drop distance falls off");
        assert!(rig.bodies.get(id).unwrap().uses_gravity());
        assert_eq!(suction.phase(), SuctionPhase::Idle);
    }

    #[test]
    fn test_release_while_extending_retracts_empty() {
        let mut rig = TestRig::new();
        let id = rig.add_throwable(MOUTH + Vec3::new(4.0, 0.0, 0.0));
        let mut suction = SuctionThrowController::new();

        suction.press(&mut rig.ctx());
        suction.update(&mut rig.ctx());
        assert!(suction.is_suctioning(id));

        suction.release(&mut rig.ctx());

        assert_eq!(suction.phase(), SuctionPhase::Retracting);
        assert_eq!(rig.tongue.target(), Some(rig.tongue.home()));
        assert!(suction.held().is_none());
        let body = rig.bodies.get(id).unwrap();
        assert!(body.uses_gravity(), "Release lets go of pulled bodies");
        assert_eq!(body.velocity, Vec3::ZERO);

        for _ in 0..100 {
            rig.tongue.update(0.02);
            suction.update(&mut rig.ctx());
            if suction.phase() == SuctionPhase::Idle {
                break;
            }
        }

        assert_eq!(suction.phase(), SuctionPhase::Idle);
        assert_eq!(rig.tongue.mode(), TongueMode::Aim);
        assert!(suction.held().is_none(), "Nothing was caught on the way back");
    }
}
