//! Game tuning
//!
//! Every gameplay constant the simulation reads lives here so a host can
//! override the feel of a run with a JSON blob. Defaults reproduce the
//! shipped tuning.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Procedural world generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Ceiling: no platform is created at or above this y
    pub min_platform_y: f32,
    /// Spacing between consecutive platforms at height 0
    pub base_spacing: f32,
    /// Extra spacing added every `spacing_band` height units
    pub spacing_step: f32,
    /// Height units per spacing step
    pub spacing_band: u32,
    /// Platform center x range
    pub min_x: f32,
    pub max_x: f32,
    /// Platform width range
    pub min_width: f32,
    pub max_width: f32,
    /// Platform thickness
    pub platform_thickness: f32,
    /// y of the generation cursor when a run starts
    pub start_y: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            min_platform_y: -45000.0, // height 5000
            base_spacing: 120.0,
            spacing_step: 20.0,
            spacing_band: 500,
            min_x: 100.0,
            max_x: 650.0,
            min_width: 100.0,
            max_width: 200.0,
            platform_thickness: 28.0,
            start_y: 4800.0,
        }
    }
}

/// Generate-ahead / cleanup-behind window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Platforms must exist at least this far above the player
    pub lookahead: f32,
    /// Platforms further than this below the player are evicted
    pub cleanup_distance: f32,
    /// Max platforms generated per pass
    pub batch: u32,
    /// Seconds between window passes (0 = every tick)
    pub check_interval: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            lookahead: 1000.0,
            cleanup_distance: 2000.0,
            batch: 10,
            check_interval: 0.1,
        }
    }
}

/// Player movement feel (units/s and units/s²; negative y is up)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_speed: f32,
    /// Horizontal cap while a combo speed boost is active
    pub super_max_speed: f32,

    /// Jump velocity from a standstill
    pub min_jump_velocity: f32,
    /// Extra jump velocity at full running speed
    pub momentum_bonus_cap: f32,
    pub combo_bonus_per_level: f32,
    pub combo_bonus_cap: f32,
    /// How long holding jump keeps boosting (seconds)
    pub max_jump_hold_time: f32,
    /// Upward acceleration applied while the jump is held
    pub jump_hold_boost: f32,

    /// Max falling speed while sliding down a wall
    pub wall_slide_speed: f32,
    pub wall_jump_velocity: f32,
    pub wall_jump_force: f32,

    /// Continuous fall time before the player reads as falling (seconds)
    pub fall_duration_threshold: f32,
    /// |vx| / max_speed above which the speed trail shows
    pub speed_trail_ratio: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            acceleration: 650.0,
            deceleration: 780.0,
            max_speed: 600.0,
            super_max_speed: 900.0,

            min_jump_velocity: -400.0,
            momentum_bonus_cap: 200.0,
            combo_bonus_per_level: 10.0,
            combo_bonus_cap: 100.0,
            max_jump_hold_time: 0.3,
            jump_hold_boost: 15.0 / FRAME_DT, // 15 per frame at 60 Hz

            wall_slide_speed: 150.0,
            wall_jump_velocity: -520.0,
            wall_jump_force: 260.0,

            fall_duration_threshold: 0.5,
            speed_trail_ratio: 0.7,
        }
    }
}

/// Combo chain rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboSettings {
    /// Airborne time without a new landing before the combo drops (seconds)
    pub reset_delay: f64,
    /// Combo level that must be exceeded to start a speed boost
    pub speed_boost_threshold: u32,
    /// Speed boost lifetime (seconds)
    pub speed_boost_duration: f64,
}

impl Default for ComboSettings {
    fn default() -> Self {
        Self {
            reset_delay: 1.0,
            speed_boost_threshold: 10,
            speed_boost_duration: 3.0,
        }
    }
}

/// Rising hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerSettings {
    /// Where the hazard waits before it activates
    pub start_y: f32,
    /// Rise speed once active (units/s)
    pub rising_speed: f32,
    /// Score that must be exceeded to wake the hazard
    pub activation_score: u32,
    /// Falling below this y ends the run regardless of the hazard
    pub floor_y: f32,
    /// Seconds between warning effects
    pub warning_interval: f64,
}

impl Default for DangerSettings {
    fn default() -> Self {
        Self {
            start_y: 5200.0,
            rising_speed: 0.5 / FRAME_DT, // 0.5 per frame at 60 Hz
            activation_score: 100,
            floor_y: 5100.0,
            warning_interval: 0.2,
        }
    }
}

/// Complete tuning for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldSettings,
    pub window: WindowSettings,
    pub movement: MovementSettings,
    pub combo: ComboSettings,
    pub danger: DangerSettings,
}

impl Settings {
    /// Parse settings from JSON. Missing fields fall back to defaults and the
    /// result is sanitized.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Serialize to JSON (for host-side tuning panels)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp every value into a range the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let w = &mut self.world;
        w.base_spacing = w.base_spacing.max(1.0);
        w.spacing_step = w.spacing_step.max(0.0);
        w.spacing_band = w.spacing_band.max(1);
        w.platform_thickness = w.platform_thickness.max(1.0);
        w.min_width = w.min_width.max(1.0);
        w.max_width = w.max_width.max(w.min_width);

        // Keep every platform inside the walls
        let interior = WALL_RIGHT_X - WALL_LEFT_X;
        w.max_width = w.max_width.min(interior);
        w.min_width = w.min_width.min(w.max_width);
        let half = w.max_width / 2.0;
        w.min_x = w.min_x.clamp(WALL_LEFT_X + half, WALL_RIGHT_X - half);
        w.max_x = w.max_x.clamp(w.min_x, WALL_RIGHT_X - half);
        w.start_y = w.start_y.min(GROUND_Y);

        let win = &mut self.window;
        win.lookahead = win.lookahead.max(0.0);
        win.cleanup_distance = win.cleanup_distance.max(0.0);
        win.batch = win.batch.max(1);
        win.check_interval = win.check_interval.max(0.0);

        let m = &mut self.movement;
        m.acceleration = m.acceleration.max(0.0);
        m.deceleration = m.deceleration.max(0.0);
        m.max_speed = m.max_speed.max(1.0);
        m.super_max_speed = m.super_max_speed.max(m.max_speed);
        m.min_jump_velocity = m.min_jump_velocity.min(0.0);
        m.momentum_bonus_cap = m.momentum_bonus_cap.max(0.0);
        m.combo_bonus_per_level = m.combo_bonus_per_level.max(0.0);
        m.combo_bonus_cap = m.combo_bonus_cap.max(0.0);
        m.max_jump_hold_time = m.max_jump_hold_time.max(0.0);
        m.jump_hold_boost = m.jump_hold_boost.max(0.0);
        m.wall_slide_speed = m.wall_slide_speed.max(0.0);
        m.wall_jump_velocity = m.wall_jump_velocity.min(0.0);
        m.wall_jump_force = m.wall_jump_force.max(0.0);
        m.fall_duration_threshold = m.fall_duration_threshold.max(0.0);

        let c = &mut self.combo;
        c.reset_delay = c.reset_delay.max(0.0);
        c.speed_boost_duration = c.speed_boost_duration.max(0.0);

        let d = &mut self.danger;
        d.rising_speed = d.rising_speed.max(0.0);
        d.warning_interval = d.warning_interval.max(0.01);

        self
    }
}
