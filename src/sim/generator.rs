//! Procedural platform generation
//!
//! Platforms are placed one at a time above the current cursor. Spacing grows
//! in steps as the tower gets taller, and the only stopping condition is the
//! configured ceiling.

use super::rng::RandomSource;
use super::world::{Platform, World};
use crate::height_at;
use crate::settings::WorldSettings;

/// Places new platforms above the world's generation cursor
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    settings: WorldSettings,
    ceiling_logged: bool,
}

impl WorldGenerator {
    pub fn new(settings: WorldSettings) -> Self {
        Self {
            settings,
            ceiling_logged: false,
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Vertical gap to use when the cursor sits at `cursor_y`.
    ///
    /// `base + floor(height / band) * step`, so difficulty rises in discrete
    /// steps and never decreases with height.
    pub fn spacing_at(&self, cursor_y: f32) -> f32 {
        let steps = height_at(cursor_y) / self.settings.spacing_band;
        self.settings.base_spacing + steps as f32 * self.settings.spacing_step
    }

    /// Whether another platform would still fit below the ceiling
    pub fn can_generate(&self, world: &World) -> bool {
        let cursor = world.highest_y();
        cursor - self.spacing_at(cursor) > self.settings.min_platform_y
    }

    /// Create the next platform above the cursor, or `None` once the ceiling
    /// is reached. `None` ends this call, not the run.
    pub fn generate_next(
        &mut self,
        world: &mut World,
        rng: &mut dyn RandomSource,
    ) -> Option<Platform> {
        let cursor = world.highest_y();
        let y = cursor - self.spacing_at(cursor);
        if y <= self.settings.min_platform_y {
            if !self.ceiling_logged {
                log::info!(
                    "Tower ceiling reached at y={} after {} platforms",
                    cursor,
                    world.total_generated()
                );
                self.ceiling_logged = true;
            }
            return None;
        }

        let s = &self.settings;
        let x = rng.range_f32(s.min_x, s.max_x);
        let width = rng.range_f32(s.min_width, s.max_width);
        Some(world.push(x, y, width, s.platform_thickness))
    }

    /// Fill the first window above the spawn point for a new run.
    ///
    /// Generates until the cursor is at least `lookahead` above `from_y` or
    /// the ceiling stops it. Returns how many platforms were created.
    pub fn seed_initial(
        &mut self,
        world: &mut World,
        rng: &mut dyn RandomSource,
        from_y: f32,
        lookahead: f32,
    ) -> usize {
        let mut created = 0;
        while from_y - world.highest_y() < lookahead {
            if self.generate_next(world, rng).is_none() {
                break;
            }
            created += 1;
        }
        log::debug!("Seeded {} initial platforms (top y={})", created, world.highest_y());
        created
    }

    /// Forget per-run bookkeeping
    pub fn reset(&mut self) {
        self.ceiling_logged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::rng::{PcgSource, SequenceSource};
    use crate::y_for_height;
    use proptest::prelude::*;

    fn world_generator() -> WorldGenerator {
        WorldGenerator::new(Settings::default().world)
    }

    #[test]
    fn test_first_platform_uses_base_spacing() {
        let mut generator = world_generator();
        let mut world = World::new(4800.0);
        let mut rng = SequenceSource::midpoint();
        let p = generator.generate_next(&mut world, &mut rng).unwrap();
        assert_eq!(p.y, 4680.0);
        assert_eq!(p.x, 375.0);
        assert_eq!(p.width, 150.0);
        assert_eq!(p.height, 28.0);
    }

    #[test]
    fn test_spacing_steps_every_500_height_units() {
        let generator = world_generator();
        assert_eq!(generator.spacing_at(y_for_height(0)), 120.0);
        assert_eq!(generator.spacing_at(y_for_height(499)), 120.0);
        assert_eq!(generator.spacing_at(y_for_height(500)), 140.0);
        assert_eq!(generator.spacing_at(y_for_height(1999)), 180.0);
        assert_eq!(generator.spacing_at(y_for_height(2000)), 200.0);
    }

    #[test]
    fn test_generation_halts_at_ceiling() {
        let mut generator = world_generator();
        let mut world = World::new(4800.0);
        let mut rng = PcgSource::new(3);
        let mut count = 0;
        while generator.generate_next(&mut world, &mut rng).is_some() {
            count += 1;
            assert!(count < 10_000, "generation never stopped");
        }
        let ceiling = generator.settings().min_platform_y;
        assert!(world.platforms().iter().all(|p| p.y > ceiling));
        assert!(!generator.can_generate(&world));
        // Still refuses on repeated calls
        assert!(generator.generate_next(&mut world, &mut rng).is_none());
        assert_eq!(world.len(), count);
    }

    #[test]
    fn test_spacing_non_decreasing_over_2000_units() {
        let mut generator = world_generator();
        let mut world = World::new(4800.0);
        let mut rng = SequenceSource::new(vec![0.1, 0.9, 0.4]);
        let target = y_for_height(2000 + 20);
        while world.highest_y() > target {
            generator.generate_next(&mut world, &mut rng).unwrap();
        }
        let gaps: Vec<f32> = world
            .platforms()
            .windows(2)
            .map(|w| w[0].y - w[1].y)
            .collect();
        assert!(gaps.iter().all(|g| *g >= 120.0));
        assert!(gaps.windows(2).all(|w| w[1] >= w[0]));
        // Four bands crossed: 120, 140, 160, 180 and into 200
        let mut distinct = gaps.clone();
        distinct.dedup();
        assert_eq!(distinct, vec![120.0, 140.0, 160.0, 180.0, 200.0]);
    }

    #[test]
    fn test_seed_initial_fills_lookahead() {
        let mut generator = world_generator();
        let mut world = World::new(4800.0);
        let mut rng = PcgSource::new(11);
        let created = generator.seed_initial(&mut world, &mut rng, 4800.0, 1000.0);
        assert_eq!(created, 9); // ceil(1000 / 120)
        assert!(4800.0 - world.highest_y() >= 1000.0);
    }

    proptest! {
        #[test]
        fn prop_platforms_strictly_ascend_and_stay_in_bounds(seed in any::<u64>(), n in 1usize..200) {
            let mut generator = world_generator();
            let mut world = World::new(4800.0);
            let mut rng = PcgSource::new(seed);
            for _ in 0..n {
                if generator.generate_next(&mut world, &mut rng).is_none() {
                    break;
                }
            }
            let s = generator.settings();
            for w in world.platforms().windows(2) {
                prop_assert!(w[1].y < w[0].y);
                prop_assert!(w[0].y - w[1].y >= s.base_spacing);
            }
            for p in world.platforms() {
                prop_assert!(p.x >= s.min_x && p.x <= s.max_x);
                prop_assert!(p.width >= s.min_width && p.width <= s.max_width);
                prop_assert!(p.left() >= crate::consts::WALL_LEFT_X);
                prop_assert!(p.right() <= crate::consts::WALL_RIGHT_X);
                prop_assert_eq!(p.zone, crate::sim::ZoneType::for_height(p.height_units()));
            }
        }
    }
}
