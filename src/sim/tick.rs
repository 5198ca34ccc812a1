//! Per-frame simulation tick
//!
//! Reads the physics backend, runs every gameplay system once in a fixed
//! order and pushes the results back out to the host.

use glam::Vec2;

use super::host::{BackdropZone, Collaborators, Support};
use super::movement::{MoveInput, MovementEvent, WallContact};
use super::rng::RandomSource;
use super::state::{GamePhase, Simulation};
use super::world::PlatformId;
use crate::consts::*;
use crate::height_at;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump / wall jump
    pub up: bool,
    /// Start a new run (only honoured after game over)
    pub restart: bool,
}

impl TickInput {
    fn movement(&self) -> MoveInput {
        MoveInput {
            left: self.left,
            right: self.right,
            up: self.up,
        }
    }
}

/// Horizontal offset of the wall slide effect from the player center
const WALL_SLIDE_OFFSET: f32 = 15.0;

/// Landing speed that maps to an effect intensity of 1
const LANDING_REFERENCE_SPEED: f32 = 500.0;

/// Advance the run by one frame.
///
/// `dt` is the frame time in seconds (clamped to [`MAX_DT`]); `now` is the
/// host clock in seconds, sampled once per frame.
pub fn tick<R: RandomSource>(
    sim: &mut Simulation<R>,
    input: &TickInput,
    dt: f32,
    now: f64,
    host: &mut Collaborators,
) {
    if sim.phase == GamePhase::GameOver {
        if input.restart {
            sim.restart(None, host);
        }
        return;
    }

    if !sim.is_started() {
        sim.start(host);
    }

    let dt = dt.clamp(0.0, MAX_DT);
    sim.time_ticks += 1;

    let touching = host.physics.query_touching();
    let (position, velocity) = host.physics.body();
    // Velocity we wrote last tick, before the backend zeroed it on contact
    let impact_speed = sim.player.velocity.y;
    sim.player.position = position;
    sim.player.velocity = velocity;

    // Landings
    if touching.down {
        if !sim.player.was_grounded {
            let intensity = (impact_speed / LANDING_REFERENCE_SPEED).clamp(0.2, 3.0);
            host.outputs.on_land(position, intensity);
        }
        match touching.support {
            Some(Support::Ground) => ground_contact(sim, host),
            Some(Support::Platform(id)) if id.is_ground() => ground_contact(sim, host),
            Some(Support::Platform(id)) => platform_landing(sim, id, now, host),
            None => {}
        }
    }
    sim.player.was_grounded = touching.down;

    // Movement
    let events = sim.movement.step(
        &mut sim.player,
        input.movement(),
        touching,
        sim.combo.combo(),
        sim.combo.speed_boost_active(),
        dt,
    );
    for event in events {
        match event {
            MovementEvent::Jumped { power } => host.outputs.on_jump(position, power),
            MovementEvent::WallJumped { from } => {
                if sim.combo.on_wall_jump() {
                    log::debug!("Wall jump off {:?} dropped the combo", from);
                    host.outputs.on_combo_changed(0, sim.combo.multiplier());
                }
            }
            MovementEvent::WallSliding { wall } => {
                let side = if wall == WallContact::Left { -1.0 } else { 1.0 };
                let at = position + Vec2::new(side * WALL_SLIDE_OFFSET, 0.0);
                host.outputs.on_wall_slide(at, 1.0);
            }
        }
    }
    host.physics.set_velocity(sim.player.velocity);

    let speed_ratio = sim.player.velocity.x.abs() / sim.movement.settings().max_speed;
    if speed_ratio > sim.movement.settings().speed_trail_ratio {
        host.outputs.on_speed_trail(position, speed_ratio);
    }

    // World window
    if sim.window.due(now) {
        sim.run_window(host);
    }

    // Score and backdrop
    if let Some(height) = sim.score.update(position.y, sim.combo.multiplier_tenths()) {
        host.outputs.on_height_changed(height);
    }
    let zone = BackdropZone::for_height(height_at(position.y));
    if sim.backdrop != Some(zone) {
        sim.backdrop = Some(zone);
        host.outputs.sync_backdrop(zone);
    }

    // Hazard
    sim.danger.update(sim.score.score(), dt);
    if sim.danger.active {
        host.outputs.sync_danger_zone(&sim.danger);
        if sim.danger.take_warning() {
            let clearance = sim.danger.clearance(position.y);
            let intensity = (1.0 - clearance / 1000.0).clamp(0.2, 1.0);
            host.outputs
                .on_danger_warning(Vec2::new(GROUND_CENTER_X, sim.danger.y), intensity);
        }
    }

    // Combo timeout
    if sim.combo.tick(now, touching.airborne()) {
        host.outputs.on_combo_changed(0, sim.combo.multiplier());
    }

    host.outputs.sync_player(
        position,
        sim.player.velocity,
        sim.player.facing,
        sim.player.is_falling,
    );

    if sim.danger.touches(position.y) {
        sim.phase = GamePhase::GameOver;
        let state = sim.combo.state();
        log::info!(
            "Game over at y={}: score={} height={} max combo={}",
            position.y,
            sim.score.score(),
            sim.score.current_height(),
            state.max_combo
        );
        host.outputs.on_game_over(sim.score.score(), state.max_combo);
    }
}

fn ground_contact<R: RandomSource>(sim: &mut Simulation<R>, host: &mut Collaborators) {
    if sim.combo.on_ground_contact() {
        host.outputs.on_combo_changed(0, sim.combo.multiplier());
    }
}

fn platform_landing<R: RandomSource>(
    sim: &mut Simulation<R>,
    id: PlatformId,
    now: f64,
    host: &mut Collaborators,
) {
    if !sim.world.contains(id) {
        log::trace!("Ignoring landing on unknown platform {:?}", id);
        return;
    }
    let Some(landing) = sim.combo.on_landing(id, now) else {
        return;
    };

    host.outputs.on_combo_changed(landing.combo, landing.multiplier);
    host.outputs.on_combo(sim.player.position, landing.combo as f32);
    if landing.milestone {
        host.outputs.show_combo_popup(landing.combo);
    }
}
