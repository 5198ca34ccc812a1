//! Generate-ahead / cleanup-behind window
//!
//! Keeps world memory bounded: platforms are created in small batches while
//! the top of the tower is within reach of the player, and dropped once they
//! are far enough below.

use super::generator::WorldGenerator;
use super::rng::RandomSource;
use super::world::{Platform, World};
use crate::settings::WindowSettings;

/// What one window pass changed
#[derive(Debug, Clone, Default)]
pub struct WindowReport {
    pub generated: Vec<Platform>,
    pub evicted: Vec<Platform>,
}

impl WindowReport {
    /// True when the live platform collection changed
    pub fn changed(&self) -> bool {
        !self.generated.is_empty() || !self.evicted.is_empty()
    }
}

/// Decides when to generate and what to evict
#[derive(Debug, Clone)]
pub struct WindowManager {
    settings: WindowSettings,
    /// `now` of the last pass (None until the first pass of a run)
    last_check: Option<f64>,
}

impl WindowManager {
    pub fn new(settings: WindowSettings) -> Self {
        Self {
            settings,
            last_check: None,
        }
    }

    pub fn settings(&self) -> &WindowSettings {
        &self.settings
    }

    /// Change the pass interval (seconds, 0 = every tick)
    pub fn set_check_interval(&mut self, seconds: f64) {
        self.settings.check_interval = seconds.max(0.0);
    }

    /// Throttle gate: true (and arms the next interval) if a pass is due at `now`
    pub fn due(&mut self, now: f64) -> bool {
        let due = match self.last_check {
            None => true,
            Some(last) => now - last >= self.settings.check_interval,
        };
        if due {
            self.last_check = Some(now);
        }
        due
    }

    /// Upper bound on live platforms in steady state for these settings.
    ///
    /// Live platforms span at most `lookahead + cleanup_distance` plus the
    /// one platform that overshoots the lookahead line.
    pub fn live_bound(&self, min_spacing: f32) -> usize {
        let span = self.settings.lookahead + self.settings.cleanup_distance;
        (span / min_spacing.max(1.0)).ceil() as usize + 1
    }

    /// Run one pass: generate ahead of `player_y`, then evict behind it.
    pub fn tick(
        &mut self,
        player_y: f32,
        world: &mut World,
        generator: &mut WorldGenerator,
        rng: &mut dyn RandomSource,
    ) -> WindowReport {
        let mut report = WindowReport::default();

        // Top of the tower must sit at least `lookahead` above the player
        for _ in 0..self.settings.batch {
            if player_y - world.highest_y() >= self.settings.lookahead {
                break;
            }
            match generator.generate_next(world, rng) {
                Some(platform) => report.generated.push(platform),
                None => break,
            }
        }

        report.evicted = world.evict_below(player_y + self.settings.cleanup_distance);

        if report.changed() {
            log::debug!(
                "Window pass at y={}: +{} -{} (live {})",
                player_y,
                report.generated.len(),
                report.evicted.len(),
                world.len()
            );
        }
        report
    }

    /// Forget the throttle clock for a fresh run
    pub fn reset(&mut self) {
        self.last_check = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::rng::PcgSource;

    fn setup() -> (WindowManager, WorldGenerator, World, PcgSource) {
        let settings = Settings::default();
        (
            WindowManager::new(settings.window),
            WorldGenerator::new(settings.world.clone()),
            World::new(settings.world.start_y),
            PcgSource::new(5),
        )
    }

    #[test]
    fn test_generates_until_lookahead_covered() {
        let (mut window, mut generator, mut world, mut rng) = setup();
        let report = window.tick(4800.0, &mut world, &mut generator, &mut rng);
        // 9 × 120 = 1080 is the first multiple past the 1000 lookahead
        assert_eq!(report.generated.len(), 9);
        assert!(report.evicted.is_empty());
        assert!(4800.0 - world.highest_y() >= 1000.0);

        // Already covered: nothing more this pass
        let report = window.tick(4800.0, &mut world, &mut generator, &mut rng);
        assert!(report.generated.is_empty());
    }

    #[test]
    fn test_batch_caps_one_pass() {
        let mut settings = Settings::default();
        settings.window.lookahead = 3000.0;
        let mut window = WindowManager::new(settings.window);
        let mut generator = WorldGenerator::new(settings.world.clone());
        let mut world = World::new(settings.world.start_y);
        let mut rng = PcgSource::new(5);

        let report = window.tick(4800.0, &mut world, &mut generator, &mut rng);
        assert_eq!(report.generated.len(), 10);
        let report = window.tick(4800.0, &mut world, &mut generator, &mut rng);
        assert_eq!(report.generated.len(), 10);
    }

    #[test]
    fn test_idle_when_lookahead_satisfied() {
        let (mut window, mut generator, mut world, mut rng) = setup();
        generator.seed_initial(&mut world, &mut rng, 4800.0, 1500.0);
        let before = world.len();
        let report = window.tick(4800.0, &mut world, &mut generator, &mut rng);
        assert!(!report.changed());
        assert_eq!(world.len(), before);
    }

    #[test]
    fn test_evicts_platforms_far_below() {
        let (mut window, mut generator, mut world, mut rng) = setup();
        generator.seed_initial(&mut world, &mut rng, 4800.0, 3000.0);
        let player_y = 1500.0;
        let report = window.tick(player_y, &mut world, &mut generator, &mut rng);
        assert!(!report.evicted.is_empty());
        assert!(report.evicted.iter().all(|p| p.y > player_y + 2000.0));
        assert!(world.platforms().iter().all(|p| p.y <= player_y + 2000.0));
    }

    #[test]
    fn test_stops_at_ceiling_without_failing() {
        let (mut window, mut generator, mut world, mut rng) = setup();
        let top = generator.settings().min_platform_y;
        for _ in 0..2000 {
            window.tick(top, &mut world, &mut generator, &mut rng);
        }
        let report = window.tick(top, &mut world, &mut generator, &mut rng);
        assert!(report.generated.is_empty());
        assert!(world.platforms().iter().all(|p| p.y > top));
    }

    #[test]
    fn test_throttle() {
        let (mut window, ..) = setup();
        assert!(window.due(0.0));
        assert!(!window.due(0.05));
        assert!(window.due(0.1));
        assert!(!window.due(0.15));
        window.set_check_interval(0.0);
        assert!(window.due(0.15));
        assert!(window.due(0.15));
    }

    #[test]
    fn test_live_bound_holds_while_climbing() {
        let (mut window, mut generator, mut world, mut rng) = setup();
        let bound = window.live_bound(generator.settings().base_spacing);
        // (1000 + 2000) / 120 platforms plus the one past the lookahead line
        assert_eq!(bound, 26);

        let mut y = 4800.0;
        let mut peak = 0;
        for _ in 0..10_000 {
            window.tick(y, &mut world, &mut generator, &mut rng);
            assert!(world.len() <= bound, "{} > {}", world.len(), bound);
            // The top platform never overshoots the lookahead by more than one gap
            if generator.can_generate(&world) {
                assert!(y - world.highest_y() < 1000.0 + generator.spacing_at(world.highest_y()) + 1.0);
            }
            peak = peak.max(world.len());
            y -= 5.0;
        }
        assert!(peak >= 20, "peak {} suspiciously low", peak);
    }
}
