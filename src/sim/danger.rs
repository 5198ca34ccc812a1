//! Rising danger zone
//!
//! Sleeps below the ground until the score passes a threshold, then rises at
//! a constant speed for the rest of the run.

use serde::{Deserialize, Serialize};

use crate::settings::DangerSettings;

/// Hazard boundary (everything below `y` is lethal once active)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    pub y: f32,
    pub active: bool,
    /// Rise speed (units/s)
    pub speed: f32,
    #[serde(skip)]
    settings: DangerSettings,
    #[serde(skip)]
    warning_timer: f64,
}

impl DangerZone {
    pub fn new(settings: DangerSettings) -> Self {
        Self {
            y: settings.start_y,
            active: false,
            speed: settings.rising_speed,
            settings,
            warning_timer: 0.0,
        }
    }

    pub fn settings(&self) -> &DangerSettings {
        &self.settings
    }

    /// Advance by `dt`. Returns true on the tick the hazard wakes up.
    pub fn update(&mut self, score: u32, dt: f32) -> bool {
        let mut activated = false;
        if !self.active && score > self.settings.activation_score {
            self.active = true;
            activated = true;
            log::info!("Danger zone active at score {}", score);
        }
        if self.active {
            self.y -= self.speed * dt;
            self.warning_timer += dt as f64;
        }
        activated
    }

    /// True once per `warning_interval` while active
    pub fn take_warning(&mut self) -> bool {
        if self.active && self.warning_timer >= self.settings.warning_interval {
            self.warning_timer -= self.settings.warning_interval;
            return true;
        }
        false
    }

    /// Whether a player at `player_y` is caught (by the hazard or the floor)
    pub fn touches(&self, player_y: f32) -> bool {
        player_y > self.y || player_y > self.settings.floor_y
    }

    /// Distance from the player down to the hazard (negative when caught)
    pub fn clearance(&self, player_y: f32) -> f32 {
        self.y - player_y
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.settings.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::Settings;

    fn zone() -> DangerZone {
        DangerZone::new(Settings::default().danger)
    }

    #[test]
    fn test_sleeps_until_threshold_exceeded() {
        let mut danger = zone();
        assert!(!danger.update(100, FRAME_DT));
        assert!(!danger.active);
        assert_eq!(danger.y, 5200.0);
        assert!(danger.update(101, FRAME_DT));
        assert!(danger.active);
        assert!(danger.y < 5200.0);
    }

    #[test]
    fn test_rises_monotonically_and_never_resets() {
        let mut danger = zone();
        danger.update(500, FRAME_DT);
        let mut last = danger.y;
        for _ in 0..600 {
            // Score dropping below the threshold does not put it back to sleep
            danger.update(0, FRAME_DT);
            assert!(danger.y < last);
            last = danger.y;
        }
        // About 0.5 units per 60 Hz tick
        assert!((5200.0 - danger.y - 0.5 * 601.0).abs() < 1.0);
    }

    #[test]
    fn test_contact_rules() {
        let mut danger = zone();
        assert!(!danger.touches(4880.0));
        // Floor applies even while asleep
        assert!(danger.touches(5101.0));
        danger.active = true;
        danger.y = 4000.0;
        assert!(danger.touches(4001.0));
        assert!(!danger.touches(3999.0));
    }

    #[test]
    fn test_warning_cadence() {
        let mut danger = zone();
        assert!(!danger.take_warning());
        danger.update(200, FRAME_DT);
        let mut warnings = 0;
        for _ in 0..60 {
            danger.update(200, FRAME_DT);
            if danger.take_warning() {
                warnings += 1;
            }
        }
        // One second of ticks at one warning per 0.2 s
        assert!((4..=5).contains(&warnings));
    }

    #[test]
    fn test_reset() {
        let mut danger = zone();
        danger.update(500, 1.0);
        danger.reset();
        assert!(!danger.active);
        assert_eq!(danger.y, 5200.0);
    }
}
