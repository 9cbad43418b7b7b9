//! Dino platformer -- headless frame driver.
//!
//! Loads a level and a recorded input sequence, then feeds the inputs
//! through the fixed-timestep accumulator one frame at a time:
//!
//!   1. `begin_frame()` -- feed the replay's frame time (sanitized there)
//!   2. `while should_step()` -- advance the world by `fixed_dt`
//!   3. drain the world's event queue and log it
//!
//! Paths default to the bundled meadow level and run; pass
//! `<level.json> [replay.json]` to override them.

mod behavior;
mod events;
mod geometry;
mod hitbox;
mod level;
mod physics;
mod player;
mod replay;
mod world;

use std::path::PathBuf;

use dino_core::time::TimeState;

use events::GameEvent;
use level::{build_world, load_level_from_path};
use replay::load_replay_from_path;

const LEVEL_PATH: &str = "assets/levels/meadow.json";
const REPLAY_PATH: &str = "assets/replays/meadow_run.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let level_path = args.next().map_or_else(|| PathBuf::from(LEVEL_PATH), PathBuf::from);
    let replay_path = args.next().map_or_else(|| PathBuf::from(REPLAY_PATH), PathBuf::from);

    let level = load_level_from_path(&level_path)?;
    let replay = load_replay_from_path(&replay_path)?;
    let mut world = build_world(&level)?;

    let inputs = replay.expanded_inputs();
    log::info!(
        "Replaying {} frames ({:.2}s) from {}",
        inputs.len(),
        replay.duration_secs(),
        replay_path.display()
    );

    let fixed_dt = f64::from(replay.fixed_dt);
    let mut time = TimeState::with_fixed_dt(fixed_dt);
    let mut won = false;
    for input in &inputs {
        time.begin_frame(fixed_dt);
        while time.should_step() {
            world.step(replay.fixed_dt, input);
        }

        for event in world.drain_events() {
            match &event {
                GameEvent::Sound(cue) => log::debug!("frame {}: sound '{}'", world.frame, cue.name()),
                GameEvent::Won => {
                    won = true;
                    log::info!("frame {}: {event}", world.frame);
                }
                _ => log::info!("frame {}: {event}", world.frame),
            }
        }
    }

    let player = &world.player;
    log::info!(
        "Run finished after {} frames, {} steps ({:.2}s simulated): state={:?} position=({:.1}, {:.1}) lives={} letters={:?} jump={} crouch={} won={}",
        time.frame_count,
        time.fixed_step_count,
        time.total_time,
        player.state,
        player.body.position.x,
        player.body.position.y,
        player.lives,
        player.letters_collected,
        player.is_jump_unlocked,
        player.is_crouch_unlocked,
        won
    );
    log::info!(
        "Animation '{}' frame {} ({} objects left)",
        player.current_frame().clip_name,
        player.current_frame().index,
        world.interactables.len()
    );
    Ok(())
}
