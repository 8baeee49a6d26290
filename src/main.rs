//! Lilypad - headless runner
//!
//! Plays a scripted input sequence through the test course and logs every
//! locomotion transition. Set `RUST_LOG=debug` to see ability and force
//! volume activity as well.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::Vec3;
use lilypad_game::{Level, PlayerInput, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "lilypad")]
#[command(about = "Run the lilypad movement engine without a renderer", long_about = None)]
struct Args {
    /// RON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "300")]
    ticks: u64,

    /// Scripted input to play
    #[arg(short, long, value_enum, default_value = "tour")]
    scenario: Scenario,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// Stand still
    Idle,
    /// Walk right, jumping every second
    Hop,
    /// Grapple onto the ledge
    Grapple,
    /// Swing from the anchor and jump off
    Swing,
    /// Suck up the nearest throwable and throw it
    Suction,
    /// A bit of everything
    Tour,
}

impl Scenario {
    /// Input for tick `frame` at 50 ticks per second.
    fn input(self, frame: u64) -> PlayerInput {
        let mut input = PlayerInput {
            aim_point: Vec3::new(10.0, 1.0, 0.0),
            ..Default::default()
        };

        match self {
            Scenario::Idle => {}
            Scenario::Hop => {
                input.move_right = true;
                input.jump = frame % 50 < 15;
            }
            Scenario::Grapple => {
                input.aim_point = Vec3::new(6.0, 4.5, 0.0);
                input.abilities.grapple = frame < 5;
            }
            Scenario::Swing => {
                input.aim_point = Vec3::new(-6.0, 6.5, 0.0);
                input.abilities.swing = frame < 5;
                input.move_left = (60..120).contains(&frame);
                input.jump = (150..160).contains(&frame);
            }
            Scenario::Suction => {
                input.aim_point = Vec3::new(3.0, 0.3, 0.0);
                input.abilities.suction = (10..100).contains(&frame);
            }
            Scenario::Tour => {
                return match frame {
                    0..=99 => Scenario::Suction.input(frame),
                    100..=199 => Scenario::Hop.input(frame),
                    _ => Scenario::Grapple.input(frame - 200),
                };
            }
        }

        input
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut simulation =
        Simulation::new(config, Level::test_course()).context("starting simulation")?;
    log::info!(
        "running {:?} for {} ticks at {} Hz",
        args.scenario,
        args.ticks,
        simulation.config.tick_rate
    );

    let mut contacts = 0usize;
    for frame in 0..args.ticks {
        let report = simulation.tick(&args.scenario.input(frame));
        contacts += report.collisions.len();

        for transition in &report.transitions {
            log::info!(
                "[{:>5}] {:?} -> {:?} at {:.2?}",
                frame,
                transition.from,
                transition.to,
                simulation.player.position()
            );
        }
    }

    log::info!(
        "finished in {:?} at {:.2?}, velocity {:.2?}, {} contacts",
        simulation.state_tag(),
        simulation.player.position(),
        simulation.player.velocity(),
        contacts
    );
    for body in simulation.bodies.iter() {
        log::info!("body {} at {:.2?}", body.id, body.position);
    }

    Ok(())
}
