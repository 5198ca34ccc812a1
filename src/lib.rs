//! Tower Climber - An endless vertical platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, movement, combos, scoring)
//! - `settings`: Data-driven game tuning
//! - `web`: Browser bindings (wasm32 only)
//!
//! Rendering, input polling and the physics engine belong to the host; the
//! simulation talks to them through the traits in [`sim::host`].

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;
pub use sim::{Simulation, TickInput, tick};

/// World geometry constants
pub mod consts {
    /// Nominal frame timestep the per-frame tuning values assume (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest dt a single tick will integrate (tab switches, hitches)
    pub const MAX_DT: f32 = 0.1;

    /// World-space y of the ground line (height 0). Up is negative y.
    pub const GROUND_Y: f32 = 5000.0;
    /// World units per height unit
    pub const HEIGHT_SCALE: f32 = 10.0;

    /// Ground platform (center + size)
    pub const GROUND_CENTER_X: f32 = 400.0;
    pub const GROUND_CENTER_Y: f32 = 4950.0;
    pub const GROUND_WIDTH: f32 = 800.0;
    pub const GROUND_THICKNESS: f32 = 100.0;

    /// Inner faces of the tower walls
    pub const WALL_LEFT_X: f32 = 0.0;
    pub const WALL_RIGHT_X: f32 = 750.0;

    /// Player spawn point and collision body
    pub const SPAWN_X: f32 = 400.0;
    pub const SPAWN_Y: f32 = 4800.0;
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;

    /// Arcade gravity (units/s², positive is down)
    pub const GRAVITY: f32 = 1040.0;
}

/// Height in whole units above the ground line for a world-space y.
///
/// Never negative: anything at or below the ground reads as 0.
#[inline]
pub fn height_at(y: f32) -> u32 {
    let units = ((consts::GROUND_Y - y) / consts::HEIGHT_SCALE).floor();
    if units <= 0.0 { 0 } else { units as u32 }
}

/// World-space y of the ground-side edge of a height unit (inverse of [`height_at`])
#[inline]
pub fn y_for_height(height: u32) -> f32 {
    consts::GROUND_Y - height as f32 * consts::HEIGHT_SCALE
}
