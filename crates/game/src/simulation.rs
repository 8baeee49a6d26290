//! Game simulation - the main game loop.
//!
//! A [`Simulation`] is the single context object for a session: it owns
//! the level, the player's movement state, the tongue, dynamic bodies and
//! the ability handlers, and advances all of them once per fixed tick.
//! Nothing lives in global state, so two simulations fed the same inputs
//! stay identical.

use glam::Vec3;
use lilypad_physics::movement::LocomotionState;
use lilypad_physics::{MovementState, PlayerController, StateTag, TickReport};

use crate::abilities::{AbilityContext, AbilityUser};
use crate::bodies::BodySet;
use crate::config::{ConfigError, SimulationConfig};
use crate::input::{InputRouter, PlayerInput};
use crate::level::Level;
use crate::tongue::{Tongue, TongueMode};

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// The player's movement state.
    pub player: MovementState,

    pub tongue: Tongue,

    pub bodies: BodySet,

    /// Movement physics controller.
    controller: PlayerController,

    abilities: AbilityUser,

    router: InputRouter,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    ///
    /// The player spawns at the level's first spawn point, or the origin
    /// if it has none.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = PlayerController::new(config.movement.clone())?;

        let (position, facing) = level
            .get_player_spawn(0)
            .map(|spawn| (spawn.position, spawn.facing))
            .unwrap_or((Vec3::ZERO, 1.0));
        let player = controller.spawn(position, &level.collision);

        let mut tongue = Tongue::new(position, config.abilities.tongue.aim_length);
        tongue.point_at(position + Vec3::X * facing);

        let mut bodies = BodySet::new();
        for spawn in &level.throwables {
            bodies.add(spawn.position, spawn.radius, Some(spawn.throwable));
        }

        log::info!("simulation started in {} ({})", level.name, level.id);

        Ok(Self {
            frame: 0,
            config,
            level,
            player,
            tongue,
            bodies,
            controller,
            abilities: AbilityUser::new(),
            router: InputRouter::new(),
        })
    }

    /// Create a simulation with default configuration and test course.
    pub fn test() -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::default(), Level::test_course())
    }

    pub fn abilities(&self) -> &AbilityUser {
        &self.abilities
    }

    pub fn state_tag(&self) -> StateTag {
        self.player.state_tag()
    }

    /// Advance the simulation by one tick.
    ///
    /// Order: input routing, tongue, abilities, force volumes, movement,
    /// dynamic bodies, level timers.
    pub fn tick(&mut self, input: &PlayerInput) -> TickReport {
        let delta_time = self.config.delta_time();
        let delta_time_ms = self.config.delta_time_ms();

        let routed = self.router.route(input, delta_time_ms);

        self.tongue.set_origin(self.player.position());
        self.tongue.point_at(routed.aim_point);
        self.tongue.update(delta_time);

        {
            let mut ctx = AbilityContext {
                world: &self.level.collision,
                movement: &mut self.player,
                tongue: &mut self.tongue,
                bodies: &mut self.bodies,
                router: &mut self.router,
                config: &self.config.abilities,
                base_actions: self.controller.base_actions(),
                world_gravity: self.config.world_gravity,
                delta_time,
                delta_time_ms,
            };

            for &(id, phase) in &routed.abilities {
                self.abilities.handle(&mut ctx, id, phase);
            }
            self.abilities.update(&mut ctx);
        }

        self.level
            .update_force_volumes(self.player.position(), &mut self.player.forces);

        let report = self.controller.update(
            &mut self.player,
            &routed.command,
            &self.level.collision,
            delta_time,
        );

        // The tether ended or was rejected
        let tethered = matches!(self.player.state_tag(), StateTag::Grappling | StateTag::Swinging);
        if self.tongue.mode() == TongueMode::Attached && !tethered {
            self.tongue.aim();
        }

        self.bodies
            .step(&self.level.collision, self.config.world_gravity, delta_time);
        self.level.advance(delta_time);

        self.frame += 1;
        report
    }

    /// Sample points along the active grapple arc, empty when not
    /// grappling.
    pub fn grapple_preview(&self, count: usize) -> Vec<Vec3> {
        match self.player.locomotion().current() {
            LocomotionState::Grappling(state) => state
                .arc()
                .map(|arc| arc.sample_points(count))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
