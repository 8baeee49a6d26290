//! Player movement controller.
//!
//! This is the main entry point for player movement. It takes input commands
//! and advances the movement state through the collision world, one fixed
//! tick at a time.

use std::collections::VecDeque;

use glam::Vec3;

use crate::collision::CollisionWorld;
use crate::error::PhysicsError;
use crate::forces::ExternalForceAggregator;

use super::buffer::InputBuffer;
use super::config::MovementConfig;
use super::gravity::ActionSet;
use super::ground::GroundDetector;
use super::locomotion::{
    CollisionNotice, LocomotionEvent, LocomotionStateMachine, NextState, StateContext, Transition,
};
use super::push_off::OverhangPushOff;
use super::resolver::CollideAndSlide;
use super::state::{KinematicActor, MovementState, PlayerCommand};

/// What happened during one [`PlayerController::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// State changes applied this tick, in order.
    pub transitions: Vec<Transition>,
    /// Contacts found by the resolver this tick.
    pub collisions: Vec<CollisionNotice>,
}

/// Player movement controller.
///
/// Runs the fixed-tick pipeline:
/// - Ground refresh
/// - Command intake (move axis, jump press/hold/release)
/// - Active state physics with weighted external forces
/// - Input buffer countdown
/// - Event dispatch and transition
/// - Collide-and-slide step
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(MovementConfig::default())?;
/// let mut state = controller.spawn(spawn_position, &world);
///
/// // Each tick:
/// controller.update(&mut state, &command, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Movement configuration.
    pub config: MovementConfig,

    resolver: CollideAndSlide,

    push_off: Option<OverhangPushOff>,

    /// Action set of the base body form.
    actions: ActionSet,
}

impl PlayerController {
    /// Create a new player controller with the given configuration.
    pub fn new(config: MovementConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let actions = ActionSet::new(config.move_action, config.jump_action)?;

        Ok(Self {
            resolver: CollideAndSlide::new(config.physics),
            push_off: Some(OverhangPushOff::new(config.push_off, config.physics.skin_width)),
            actions,
            config,
        })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Result<Self, PhysicsError> {
        Self::new(MovementConfig::default())
    }

    /// Run without the overhang push-off rays.
    pub fn without_push_off(mut self) -> Self {
        log::warn!("overhang push-off disabled, jumps will stop dead on ledge corners");
        self.push_off = None;
        self
    }

    pub fn has_push_off(&self) -> bool {
        self.push_off.is_some()
    }

    /// Action set of the base body form.
    pub fn base_actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Create the movement state for an actor at `position`.
    ///
    /// Starts in `Grounded` when the ground check finds something beneath
    /// the spawn point, `Falling` otherwise.
    pub fn spawn(&self, position: Vec3, world: &CollisionWorld) -> MovementState {
        let mut actor = KinematicActor::new(position);
        let mut ground = GroundDetector::new(self.config.ground_check);
        let mut input = InputBuffer::new();
        let mut actions = self.actions;

        ground.refresh(world, position);
        let initial = if ground.is_grounded() {
            NextState::Grounded
        } else {
            NextState::Falling
        };

        let locomotion = {
            let mut ctx = StateContext {
                actor: &mut actor,
                input: &mut input,
                actions: &mut actions,
                ground: ground.contact(),
                move_axis: 0.0,
                world,
                config: &self.config,
                push_off: self.push_off.as_ref(),
                external_force: Vec3::ZERO,
                multipliers: self.config.force_multipliers,
                delta_time: 0.0,
                delta_time_ms: 0,
            };
            LocomotionStateMachine::start(&mut ctx, initial)
        };

        log::debug!("spawned at {:?} in {:?}", position, locomotion.tag());

        MovementState {
            actor,
            ground,
            input,
            forces: ExternalForceAggregator::new(),
            move_axis: 0.0,
            actions,
            locomotion,
            events: VecDeque::new(),
        }
    }

    /// Update player movement for one tick.
    ///
    /// This is the main entry point that should be called each simulation tick.
    ///
    /// # Arguments
    ///
    /// * `state` - The actor's movement state (will be modified)
    /// * `command` - The player's input command for this tick
    /// * `world` - The collision world
    /// * `delta_time` - Time step in seconds
    pub fn update(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &CollisionWorld,
        delta_time: f32,
    ) -> TickReport {
        let mut report = TickReport::default();
        if delta_time <= 0.0 || !delta_time.is_finite() {
            return report;
        }
        let delta_time_ms = (delta_time * 1000.0).round() as u32;

        state.ground.refresh(world, state.actor.position);
        let ground = state.ground.contact();

        self.apply_command(state, command, ground.is_grounded);

        let external_force = state.forces.total_force();

        {
            let MovementState {
                actor,
                input,
                actions,
                locomotion,
                events,
                move_axis,
                ..
            } = state;

            let mut ctx = StateContext {
                actor,
                input,
                actions,
                ground,
                move_axis: *move_axis,
                world,
                config: &self.config,
                push_off: self.push_off.as_ref(),
                external_force,
                multipliers: self.config.force_multipliers,
                delta_time,
                delta_time_ms,
            };

            locomotion.fixed_update(&mut ctx);
            ctx.input.update(&ground, &self.config.time, delta_time_ms);
            locomotion.dispatch(&mut ctx, events, &mut report.transitions);
            locomotion.evaluate(&mut ctx, &mut report.transitions);
        }

        let (shape, offset) = self.config.shape.for_form(state.actor.form);
        let collisions = &mut report.collisions;
        self.resolver
            .simulate_step(world, &mut state.actor, shape, offset, delta_time, &mut |hit| {
                if let (Some(point), Some(normal)) = (hit.hit_point, hit.hit_normal) {
                    collisions.push(CollisionNotice {
                        point,
                        normal,
                        brush: hit.hit_brush,
                        layers: hit.hit_layers,
                    });
                }
            });

        // Delivered during the next tick's transition step
        state.events.extend(
            report
                .collisions
                .iter()
                .map(|notice| LocomotionEvent::CollisionDetected(*notice)),
        );

        state.input.consume_request();
        state.forces.advance(delta_time);

        report
    }

    // ========================================================================
    // Input
    // ========================================================================

    fn apply_command(&self, state: &mut MovementState, command: &PlayerCommand, grounded: bool) {
        state.move_axis = if command.move_axis.is_finite() {
            command.move_axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        if command.jump_pressed {
            state.input.press_jump(grounded, &self.config.time);
        } else if command.jump_held {
            state.input.hold_jump();
        }

        if command.jump_released {
            state.input.release_jump();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionLayers;
    use crate::forces::{ForceSource, Wind, WindSettings};
    use crate::movement::config::{GrappleAbility, JumpAction, MoveAction, SwingAbility};
    use crate::movement::locomotion::{
        CollisionNotice, GrappleRequest, LocomotionState, StateTag, SwingRequest, TransformChange,
    };
    use crate::movement::state::BodyForm;

    const DT: f32 = 0.02;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(100.0, 0.5, 5.0),
            CollisionLayers::WORLD,
        );

        world
    }

    fn controller() -> PlayerController {
        PlayerController::with_default_config().unwrap()
    }

    fn has_transition(report: &TickReport, from: StateTag, to: StateTag) -> bool {
        report.transitions.contains(&Transition { from, to })
    }

    #[test]
    fn test_spawn_state_follows_ground() {
        let world = create_test_world();
        let controller = controller();

        let standing = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);
        assert_eq!(standing.state_tag(), StateTag::Grounded);
        assert_eq!(standing.actor.gravity, controller.base_actions().gravity.fast_fall_gravity);

        let airborne = controller.spawn(Vec3::new(0.0, 10.0, 0.0), &world);
        assert_eq!(airborne.state_tag(), StateTag::Falling);
    }

    #[test]
    fn test_gravity() {
        let world = CollisionWorld::new(); // No floor - free fall
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 10.0, 0.0), &world);

        controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(state.velocity().y < 0.0, "Should be falling");
        assert!(state.position().y < 10.0);
    }

    #[test]
    fn test_fall_lands_on_floor() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 3.0, 0.0), &world);

        let mut landed = false;
        let mut contacts = 0;
        for _ in 0..100 {
            let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            contacts += report.collisions.len();
            if has_transition(&report, StateTag::Falling, StateTag::Grounded) {
                landed = true;
                break;
            }
        }

        assert!(landed, "Should land on the floor");

        for _ in 0..10 {
            let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            contacts += report.collisions.len();
        }

        assert!(contacts > 0, "Landing should report a contact");
        let y = state.position().y;
        assert!((y - 1.0).abs() < 0.05, "Should rest on the floor, y={}", y);
    }

    #[test]
    fn test_jump_from_grounded() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert!(state.is_grounded(), "Should start on ground");

        let report = controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);

        let gravity = controller.base_actions().gravity;
        assert!(has_transition(&report, StateTag::Grounded, StateTag::Jumping));
        assert_eq!(state.state_tag(), StateTag::Jumping);
        assert!(
            (state.velocity().y - gravity.initial_jump_speed).abs() < 1e-2,
            "Should launch at the initial jump speed, got {}",
            state.velocity().y
        );
        assert_eq!(state.actor.gravity, gravity.ascend_gravity);
    }

    #[test]
    fn test_held_jump_reaches_apex_then_falls() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);
        let start_y = state.position().y;

        controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        let held = PlayerCommand {
            jump_held: true,
            ..Default::default()
        };

        let mut peak = start_y;
        let mut fell = false;
        for _ in 0..200 {
            let report = controller.update(&mut state, &held, &world, DT);
            peak = peak.max(state.position().y);
            if has_transition(&report, StateTag::Jumping, StateTag::Falling) {
                fell = true;
                break;
            }
        }

        assert!(fell, "Jumping should hand over to Falling at the apex");
        let height = peak - start_y;
        assert!((height - 5.0).abs() < 0.3, "Full jump should rise ~5m, got {}", height);
    }

    #[test]
    fn test_early_release_cuts_jump() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);
        let start_y = state.position().y;

        controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        let release = PlayerCommand {
            jump_released: true,
            ..Default::default()
        };
        controller.update(&mut state, &release, &world, DT);
        assert_eq!(state.actor.gravity, controller.base_actions().gravity.fast_fall_gravity);

        let mut peak = start_y;
        for _ in 0..100 {
            controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            peak = peak.max(state.position().y);
        }

        assert!(peak - start_y < 3.0, "Released jump should stay low, got {}", peak - start_y);
    }

    #[test]
    fn test_coyote_jump_after_leaving_ledge() {
        let mut world = CollisionWorld::new();
        // Ledge spanning x in [-10, 0], top at y=0
        world.add_box(
            Vec3::new(-5.0, -0.5, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            CollisionLayers::WORLD,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(-2.0, 1.0, 0.0), &world);
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        // Step past the edge
        state.actor.position.x = 1.0;
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert!(has_transition(&report, StateTag::Grounded, StateTag::Falling));
        assert!(state.input.coyote_buffered());

        let report = controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        assert!(
            has_transition(&report, StateTag::Falling, StateTag::Jumping),
            "Press inside coyote time should jump"
        );
    }

    #[test]
    fn test_late_press_is_buffered_until_landing() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.3, 0.0), &world);
        assert_eq!(state.state_tag(), StateTag::Falling);

        controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        assert!(state.input.jump_buffered());

        let mut jumped = false;
        for _ in 0..9 {
            let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            if has_transition(&report, StateTag::Grounded, StateTag::Jumping) {
                jumped = true;
                break;
            }
        }

        assert!(jumped, "Buffered press should fire on landing");
    }

    #[test]
    fn test_walk_moves_right() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        for _ in 0..50 {
            controller.update(&mut state, &PlayerCommand::moving(1.0), &world, DT);
        }

        assert!(state.position().x > 1.0, "Should have moved right, x={}", state.position().x);
        assert!(state.velocity().x <= controller.config.move_action.max_horizontal_speed + 1e-3);
        assert_eq!(state.state_tag(), StateTag::Grounded);
        assert_eq!(state.position().z, 0.0);
    }

    #[test]
    fn test_grapple_request_launches() {
        let mut world = create_test_world();
        world.add_box(
            Vec3::new(8.0, 4.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::GRAPPLE,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        state.push_event(LocomotionEvent::GrappleRequested(GrappleRequest {
            target: Vec3::new(7.5, 4.0, 0.0),
            ability: GrappleAbility::default(),
        }));
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(has_transition(&report, StateTag::Grounded, StateTag::Grappling));
        assert!(state.velocity().x > 0.0);
        assert!(state.velocity().y > 0.0);

        let mut ended = false;
        for _ in 0..300 {
            let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            if report
                .transitions
                .iter()
                .any(|t| t.from == StateTag::Grappling)
            {
                ended = true;
                break;
            }
        }
        assert!(ended, "Grapple should end on contact");
    }

    #[test]
    fn test_grapple_out_of_range_falls_back() {
        let mut world = create_test_world();
        world.add_box(
            Vec3::new(40.0, 4.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::GRAPPLE,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        state.push_event(LocomotionEvent::GrappleRequested(GrappleRequest {
            target: Vec3::new(39.5, 4.0, 0.0),
            ability: GrappleAbility::default(),
        }));
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(!report.transitions.iter().any(|t| t.to == StateTag::Grappling));
        assert_eq!(state.state_tag(), StateTag::Grounded);
    }

    #[test]
    fn test_swing_never_stretches_rope() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, 8.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::SWING,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(3.0, 5.0, 0.0), &world);
        let pivot = Vec3::new(0.0, 7.5, 0.0);

        state.push_event(LocomotionEvent::SwingRequested(SwingRequest {
            pivot,
            ability: SwingAbility::default(),
        }));
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert_eq!(state.state_tag(), StateTag::Swinging);

        let rest = (Vec3::new(3.0, 5.0, 0.0) - pivot).length();
        for tick in 0..300 {
            controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            let length = (state.position() - pivot).length();
            assert!(length <= rest + 0.01, "Rope stretched to {} at tick {}", length, tick);
        }
        assert_eq!(state.state_tag(), StateTag::Swinging);

        let report = controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        assert!(has_transition(&report, StateTag::Swinging, StateTag::Jumping));
    }

    #[test]
    fn test_grapple_ignores_contact_right_after_launch() {
        let mut world = create_test_world();
        world.add_box(
            Vec3::new(8.0, 4.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::GRAPPLE,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        state.push_event(LocomotionEvent::GrappleRequested(GrappleRequest {
            target: Vec3::new(7.5, 4.0, 0.0),
            ability: GrappleAbility::default(),
        }));
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert_eq!(state.state_tag(), StateTag::Grappling);

        // A wall brushing the launch point reports contact every tick
        let contact = LocomotionEvent::CollisionDetected(CollisionNotice {
            point: Vec3::new(0.5, 1.0, 0.0),
            normal: -Vec3::X,
            brush: Some(0),
            layers: CollisionLayers::WORLD,
        });
        let ignore_ms = controller.config.physics.grapple_ignore_ms as f32;
        let window_ticks = (ignore_ms / (DT * 1000.0)).ceil() as usize;

        for tick in 1..window_ticks {
            state.push_event(contact);
            controller.update(&mut state, &PlayerCommand::default(), &world, DT);
            assert_eq!(
                state.state_tag(),
                StateTag::Grappling,
                "Contact inside the ignore window ended the grapple at tick {}",
                tick
            );
        }

        state.push_event(contact);
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert!(
            report.transitions.iter().any(|t| t.from == StateTag::Grappling),
            "Contact after the ignore window should end the grapple"
        );
    }

    #[test]
    fn test_grapple_request_mid_flight_resolves_arc() {
        let mut world = create_test_world();
        world.add_box(
            Vec3::new(8.0, 4.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::GRAPPLE,
        );
        world.add_box(
            Vec3::new(-4.0, 5.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::GRAPPLE,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);

        state.push_event(LocomotionEvent::GrappleRequested(GrappleRequest {
            target: Vec3::new(7.5, 4.0, 0.0),
            ability: GrappleAbility::default(),
        }));
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        for _ in 0..3 {
            controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        }
        assert_eq!(state.state_tag(), StateTag::Grappling);
        assert!(state.velocity().x > 0.0);

        let second = Vec3::new(-4.0, 4.5, 0.0);
        state.push_event(LocomotionEvent::GrappleRequested(GrappleRequest {
            target: second,
            ability: GrappleAbility::default(),
        }));
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(has_transition(&report, StateTag::Grappling, StateTag::Grappling));
        let LocomotionState::Grappling(grapple) = state.locomotion().current() else {
            panic!("expected grappling, got {:?}", state.state_tag());
        };
        assert_eq!(grapple.request().target, second);
        let arc = grapple.arc().expect("re-entered grapple should solve a new arc");
        assert_eq!(arc.target, second);
        assert!(state.velocity().x < 0.0, "Launch now heads for the second anchor");
    }

    #[test]
    fn test_swing_honors_buffered_jump() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, 8.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
            CollisionLayers::SWING,
        );
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(3.0, 5.0, 0.0), &world);
        assert_eq!(state.state_tag(), StateTag::Falling);

        // Pressed a tick before the rope attaches
        controller.update(&mut state, &PlayerCommand::jump(0.0), &world, DT);
        assert!(state.input.jump_buffered());
        assert!(!state.input.jump_requested());

        state.push_event(LocomotionEvent::SwingRequested(SwingRequest {
            pivot: Vec3::new(0.0, 7.5, 0.0),
            ability: SwingAbility::default(),
        }));
        let report = controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(has_transition(&report, StateTag::Falling, StateTag::Swinging));
        assert!(
            has_transition(&report, StateTag::Swinging, StateTag::Jumping),
            "Buffered press should jump off the rope, got {:?}",
            report.transitions
        );
    }

    #[test]
    fn test_transform_event_swaps_body() {
        let world = create_test_world();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 1.0, 0.0), &world);
        let ball = ActionSet::new(MoveAction::ball(), JumpAction::ball()).unwrap();

        state.push_event(LocomotionEvent::TransformChanged(TransformChange {
            form: BodyForm::Transformed,
            actions: ball,
        }));
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert_eq!(state.actor.form, BodyForm::Transformed);
        assert_eq!(state.actions, ball);
        assert_eq!(state.actor.gravity, ball.gravity.fast_fall_gravity);
    }

    #[test]
    fn test_wind_pushes_airborne_actor() {
        let world = CollisionWorld::new();
        let controller = controller();
        let mut state = controller.spawn(Vec3::new(0.0, 50.0, 0.0), &world);

        state.forces.register(
            1,
            ForceSource::Wind(Wind::new(WindSettings {
                direction: Vec3::X,
                strength: 10.0,
                first_half_cycle: 0.0,
                last_half_cycle: 0.0,
            })),
        );
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);

        assert!(state.velocity().x > 0.0, "Wind should push right");
    }

    #[test]
    fn test_without_push_off() {
        let controller = controller().without_push_off();
        assert!(!controller.has_push_off());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MovementConfig::default();
        config.move_action.max_horizontal_speed = -1.0;
        assert!(PlayerController::new(config).is_err());
    }
}
