//! Headless arena harness.
//! Usage: blast-arena [settings.json]
//!
//! Runs a short scripted round at the fixed timestep and prints the final
//! snapshot as JSON.

use std::process::ExitCode;

use blast_arena::consts::SIM_DT;
use blast_arena::sim::{SimEvent, Simulation, TickInput};
use blast_arena::Settings;

/// Ticks before the harness gives up on the round (one minute)
const MAX_TICKS: u32 = 60 * 60;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Blast Arena (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let mut sim = match Simulation::new(settings) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Round setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for tick in 0..MAX_TICKS {
        let inputs = scripted_inputs(tick);
        sim.tick(&inputs, SIM_DT);

        for event in sim.events() {
            match event {
                SimEvent::PlayerKilled { victim, credited } => {
                    log::info!("Player {} killed (credited: {:?})", victim, credited)
                }
                SimEvent::RoundOver { outcome } => log::info!("Outcome: {:?}", outcome),
                other => log::debug!("{:?}", other),
            }
        }
        if sim.resolver().is_over() {
            break;
        }
    }

    if !sim.resolver().is_over() {
        log::info!("Round still in progress after {} ticks", sim.time_ticks());
    }

    match sim.snapshot().to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Snapshot serialization failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Each player drops a bomb in their corner pocket and runs for cover; player 2
/// starts a few seconds after player 1.
fn scripted_inputs(tick: u32) -> [TickInput; 2] {
    let bomb = TickInput {
        place_bomb: true,
        ..Default::default()
    };
    let idle = TickInput::default();
    let p1 = match tick {
        0 => bomb,
        1..=40 => TickInput { right: 1.0, ..idle },
        41..=70 => TickInput { down: 1.0, ..idle },
        _ => idle,
    };
    let p2 = match tick {
        300 => bomb,
        301..=340 => TickInput { left: 1.0, ..idle },
        341..=370 => TickInput { up: 1.0, ..idle },
        _ => idle,
    };
    [p1, p2]
}
