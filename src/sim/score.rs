//! Height score
//!
//! Score only grows when the player reaches a new peak height. Each newly
//! climbed unit is worth the combo multiplier at the moment it is climbed.

use serde::{Deserialize, Serialize};

use crate::height_at;

/// Score readout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Best height reached this run
    pub current_height: u32,
    /// Height gains weighted by the multiplier at the time
    pub score: u32,
}

/// Monotonic peak-height scorer
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    state: ScoreState,
    /// Score in tenths of a point (multipliers are whole tenths)
    score_tenths: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn current_height(&self) -> u32 {
        self.state.current_height
    }

    /// Feed the player's y for this tick.
    ///
    /// `multiplier_tenths` is the combo multiplier times ten (10 = ×1.0).
    /// Returns the new peak height if it rose.
    pub fn update(&mut self, player_y: f32, multiplier_tenths: u32) -> Option<u32> {
        let height = height_at(player_y);
        if height <= self.state.current_height {
            return None;
        }

        let gain = (height - self.state.current_height) as u64;
        self.score_tenths += gain * multiplier_tenths.max(10) as u64;
        self.state.current_height = height;
        self.state.score = (self.score_tenths / 10).min(u32::MAX as u64) as u32;
        Some(height)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
