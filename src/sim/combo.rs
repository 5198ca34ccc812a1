//! Combo chain scoring
//!
//! A combo counts successive landings on distinct platforms. It drops on
//! ground contact, on a wall jump, or after too long in the air without a
//! new landing. Long chains unlock a temporary speed boost.

use serde::{Deserialize, Serialize};

use super::world::PlatformId;
use crate::settings::ComboSettings;

/// Chain state exposed to the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub combo: u32,
    /// Best chain this run (survives resets)
    pub max_combo: u32,
    /// Score multiplier, `1 + combo / 10`
    pub multiplier: f32,
    pub last_platform: Option<PlatformId>,
    /// `now` of the most recent counted landing
    pub last_landing_time: f64,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            combo: 0,
            max_combo: 0,
            multiplier: 1.0,
            last_platform: None,
            last_landing_time: 0.0,
        }
    }
}

/// Result of a counted landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboLanding {
    pub combo: u32,
    pub multiplier: f32,
    /// Celebration milestone (`combo > 5 && combo % 5 == 0`)
    pub milestone: bool,
    /// Landing (re)started the speed boost
    pub boost_started: bool,
}

/// Tracks the combo chain and the speed boost it feeds
#[derive(Debug, Clone)]
pub struct ComboEngine {
    settings: ComboSettings,
    state: ComboState,
    /// `now` when the current speed boost started
    boost_started_at: Option<f64>,
}

/// Milestone rule for the combo popup
pub fn is_milestone(combo: u32) -> bool {
    combo > 5 && combo % 5 == 0
}

impl ComboEngine {
    pub fn new(settings: ComboSettings) -> Self {
        Self {
            settings,
            state: ComboState::default(),
            boost_started_at: None,
        }
    }

    pub fn state(&self) -> &ComboState {
        &self.state
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn multiplier(&self) -> f32 {
        self.state.multiplier
    }

    /// Multiplier in exact tenths (`10 + combo`), for drift-free scoring
    pub fn multiplier_tenths(&self) -> u32 {
        10 + self.state.combo
    }

    pub fn speed_boost_active(&self) -> bool {
        self.boost_started_at.is_some()
    }

    /// Count a landing on `platform` at `now`.
    ///
    /// Standing on the same platform tick after tick counts once.
    pub fn on_landing(&mut self, platform: PlatformId, now: f64) -> Option<ComboLanding> {
        if self.state.last_platform == Some(platform) {
            return None;
        }

        let s = &mut self.state;
        s.combo += 1;
        s.max_combo = s.max_combo.max(s.combo);
        s.multiplier = 1.0 + s.combo as f32 * 0.1;
        s.last_platform = Some(platform);
        s.last_landing_time = now;

        let boost_started = s.combo > self.settings.speed_boost_threshold;
        if boost_started {
            if self.boost_started_at.is_none() {
                log::debug!("Speed boost at combo {}", s.combo);
            }
            self.boost_started_at = Some(now);
        }

        Some(ComboLanding {
            combo: s.combo,
            multiplier: s.multiplier,
            milestone: is_milestone(s.combo),
            boost_started,
        })
    }

    /// Touching the ground always clears the chain.
    ///
    /// Returns true if there was a chain to lose.
    pub fn on_ground_contact(&mut self) -> bool {
        self.clear()
    }

    /// Wall jumps cost the whole chain
    pub fn on_wall_jump(&mut self) -> bool {
        self.clear()
    }

    /// Airborne-idle timeout and boost expiry. Returns true if the combo dropped.
    pub fn tick(&mut self, now: f64, airborne: bool) -> bool {
        if let Some(started) = self.boost_started_at {
            if now - started > self.settings.speed_boost_duration {
                self.boost_started_at = None;
            }
        }

        let idle = now - self.state.last_landing_time;
        if self.state.combo > 0 && airborne && idle > self.settings.reset_delay {
            log::debug!("Combo {} timed out after {:.2}s airborne", self.state.combo, idle);
            return self.clear();
        }
        false
    }

    /// New run: forget everything, best chain included
    pub fn reset(&mut self) {
        self.state = ComboState::default();
        self.boost_started_at = None;
    }

    fn clear(&mut self) -> bool {
        let had_combo = self.state.combo > 0;
        self.state.combo = 0;
        self.state.multiplier = 1.0;
        self.state.last_platform = None;
        self.boost_started_at = None;
        had_combo
    }
}
