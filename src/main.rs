//! Arena Brawl - headless runner
//!
//! Plays a session with the demo AI and prints a summary. By default the
//! simulation runs as fast as possible; `--realtime` paces it with the wall
//! clock through the fixed-rate driver.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use arena_brawl::autopilot::intent_for;
use arena_brawl::hud::snapshot;
use arena_brawl::sim::{Command, GamePhase, World, apply};
use arena_brawl::{Session, Settings, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "arena-brawl", version, about = "Headless Arena Brawl session driven by the demo AI")]
struct Args {
    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this much simulated play time
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f64,

    /// Pace frames with the wall clock
    #[arg(long)]
    realtime: bool,

    /// Print the final world as JSON
    #[arg(long)]
    dump_state: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    log::info!("Arena Brawl (headless) starting with seed {}", settings.seed);

    let world = if args.realtime {
        run_realtime(&settings, args.max_seconds)
    } else {
        run_fast(&settings, args.max_seconds)
    };

    let hud = snapshot(&world);
    println!("Result:   {:?}", hud.phase);
    println!("Room:     {}", hud.room_label());
    println!("Kills:    {}/{}", hud.enemies_killed, hud.enemies_required);
    println!("Score:    {}", hud.score);
    println!("Time:     {}", hud.time);
    println!("Health:   {}/{}", hud.health, hud.max_health);
    if let Some(weapon) = &hud.weapon {
        println!("Weapon:   {weapon}");
    }

    if args.dump_state {
        match serde_json::to_string_pretty(&world) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to serialize world: {err}"),
        }
    }
}

/// Step frame after frame with no pacing
fn run_fast(settings: &Settings, max_seconds: f64) -> World {
    let frame_ms = settings.frame_ms();
    let mut world = apply(World::new(settings.tuning.clone(), settings.seed), Command::StartGame);
    let mut last_phase = world.phase;

    while world.phase.is_live() && world.play_time_secs() < max_seconds {
        let input = intent_for(&world);
        world = apply(world, Command::SetInput(input));
        world = apply(world, Command::Tick { dt_ms: frame_ms });
        last_phase = log_phase_change(last_phase, &world);
    }
    world
}

/// Drive the session from the wall clock
fn run_realtime(settings: &Settings, max_seconds: f64) -> World {
    let mut session = Session::new(settings, SystemClock::default());
    session.dispatch(Command::StartGame);
    let mut last_phase = session.world().phase;

    while session.world().phase.is_live() && session.world().play_time_secs() < max_seconds {
        let input = intent_for(session.world());
        session.set_input(input);
        if session.pump() == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
        last_phase = log_phase_change(last_phase, session.world());
    }
    session.into_world()
}

fn log_phase_change(last: GamePhase, world: &World) -> GamePhase {
    if world.phase != last {
        log::info!("{:?} -> {:?} (room {}, score {})", last, world.phase, world.room, world.score);
    }
    world.phase
}
