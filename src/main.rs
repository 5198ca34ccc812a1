//! Tower Climber entry point
//!
//! On the web the page drives the core through `tower_climber::web`. Natively
//! this is a headless runner: a simple autopilot climbs a seeded tower on the
//! arcade physics backend and the run summary is printed as JSON.
//!
//! Usage: `tower-climber [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
use tower_climber::sim::{ArcadePhysics, Collaborators, EventQueue, HostEvent, Simulation};
#[cfg(not(target_arch = "wasm32"))]
use tower_climber::{Settings, TickInput, consts::FRAME_DT, tick};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x70_57_E2;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let seconds: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(120.0);

    log::info!("Tower Climber (headless) seed={} for {}s", seed, seconds);

    let mut sim = Simulation::new(seed, Settings::default());
    let mut physics = ArcadePhysics::new();
    let mut queue = EventQueue::new();
    let mut now = 0.0f64;
    let mut jumps = 0usize;
    let mut peak_live = 0usize;

    let ticks = (seconds / FRAME_DT).ceil() as u64;
    for i in 0..ticks {
        let input = autopilot(&sim, i);
        now += FRAME_DT as f64;
        tick(
            &mut sim,
            &input,
            FRAME_DT,
            now,
            &mut Collaborators::new(&mut physics, &mut queue),
        );
        physics.step(FRAME_DT);

        jumps += queue.count(|e| matches!(e, HostEvent::Jump { .. }));
        queue.drain();
        peak_live = peak_live.max(sim.world.len());

        if sim.is_game_over() {
            break;
        }
    }

    let snapshot = sim.snapshot();
    log::info!(
        "Finished after {} ticks: height={} score={} max combo={} jumps={} peak live platforms={}",
        snapshot.time_ticks,
        snapshot.score.current_height,
        snapshot.score.score,
        snapshot.combo.max_combo,
        jumps,
        peak_live
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

/// Steer under the nearest platform above and keep hopping
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(sim: &Simulation, tick_index: u64) -> TickInput {
    let player = sim.player.position;
    // Platforms are stored bottom first
    let target = sim
        .world
        .platforms()
        .iter()
        .find(|p| p.top() < player.y - 10.0);

    let mut input = TickInput::default();
    if let Some(platform) = target {
        let dx = platform.x - player.x;
        input.left = dx < -platform.width / 4.0;
        input.right = dx > platform.width / 4.0;
    }
    // Release every so often so each jump gets a fresh press
    input.up = tick_index % 24 < 12;
    input
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is tower_climber::web::init
}
