//! Run state
//!
//! A [`Simulation`] owns everything one run mutates. Collaborators are
//! borrowed for the duration of a call and never stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::{ComboEngine, ComboState};
use super::danger::DangerZone;
use super::generator::WorldGenerator;
use super::host::{BackdropZone, Collaborators};
use super::movement::{MovementController, PlayerState};
use super::rng::{PcgSource, RandomSource, next_run_seed};
use super::score::{ScoreState, ScoreTracker};
use super::window::{WindowManager, WindowReport};
use super::world::World;
use crate::consts::*;
use crate::height_at;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Caught by the hazard; ticks are frozen until restart
    GameOver,
}

/// HUD-facing summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub score: ScoreState,
    pub combo: ComboState,
    pub speed_boost: bool,
    pub danger_y: f32,
    pub danger_active: bool,
    pub live_platforms: usize,
    pub player_position: Vec2,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Simulation<R: RandomSource = PcgSource> {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Ticks advanced this run
    pub time_ticks: u64,
    pub player: PlayerState,
    pub world: World,
    pub generator: WorldGenerator,
    pub window: WindowManager,
    pub movement: MovementController,
    pub combo: ComboEngine,
    pub score: ScoreTracker,
    pub danger: DangerZone,
    /// Last backdrop band sent to the renderer
    pub backdrop: Option<BackdropZone>,
    rng: R,
    started: bool,
}

impl Simulation<PcgSource> {
    /// New run driven by a seeded PCG stream
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_rng(seed, settings, PcgSource::new(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// New run with an explicit random source (tests use a fixed sequence)
    pub fn with_rng(seed: u64, settings: Settings, rng: R) -> Self {
        let settings = settings.sanitized();
        Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: PlayerState::default(),
            world: World::new(settings.world.start_y),
            generator: WorldGenerator::new(settings.world.clone()),
            window: WindowManager::new(settings.window.clone()),
            movement: MovementController::new(settings.movement.clone()),
            combo: ComboEngine::new(settings.combo.clone()),
            score: ScoreTracker::new(),
            danger: DangerZone::new(settings.danger.clone()),
            backdrop: None,
            rng,
            started: false,
            settings,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            phase: self.phase,
            time_ticks: self.time_ticks,
            score: self.score.state(),
            combo: self.combo.state().clone(),
            speed_boost: self.combo.speed_boost_active(),
            danger_y: self.danger.y,
            danger_active: self.danger.active,
            live_platforms: self.world.len(),
            player_position: self.player.position,
        }
    }

    /// Place the player and build the first stretch of tower.
    ///
    /// Called implicitly by the first tick; calling it again is a no-op.
    pub fn start(&mut self, host: &mut Collaborators) {
        if self.started {
            return;
        }

        let spawn = Vec2::new(SPAWN_X, SPAWN_Y);
        self.player = PlayerState::spawn(spawn);
        host.physics.place_player(spawn);

        let lookahead = self.window.settings().lookahead;
        self.generator
            .seed_initial(&mut self.world, &mut self.rng, spawn.y, lookahead);
        for platform in self.world.platforms() {
            host.physics.add_platform(platform);
        }
        host.outputs.sync_platforms(self.world.platforms());

        let zone = BackdropZone::for_height(height_at(spawn.y));
        self.backdrop = Some(zone);
        host.outputs.sync_backdrop(zone);

        self.started = true;
        log::info!(
            "Run started: seed={}, {} platforms up to y={}",
            self.seed,
            self.world.len(),
            self.world.highest_y()
        );
    }

    /// Tear the run down and begin a fresh one.
    ///
    /// `seed` of `None` derives the next seed from the current one.
    pub fn restart(&mut self, seed: Option<u64>, host: &mut Collaborators) {
        let seed = seed.unwrap_or_else(|| next_run_seed(self.seed));
        log::info!(
            "Restarting: previous seed={} score={} max combo={}, new seed={}",
            self.seed,
            self.score.score(),
            self.combo.state().max_combo,
            seed
        );

        self.teardown(host);
        self.seed = seed;
        self.rng.reseed(seed);
        self.start(host);
    }

    /// Run a window pass now, ignoring the throttle
    pub fn refresh_window(&mut self, host: &mut Collaborators) -> WindowReport {
        self.run_window(host)
    }

    /// Generate ahead / evict behind and mirror the result to the host
    pub(crate) fn run_window(&mut self, host: &mut Collaborators) -> WindowReport {
        let report = self.window.tick(
            self.player.position.y,
            &mut self.world,
            &mut self.generator,
            &mut self.rng,
        );

        for platform in &report.generated {
            host.physics.add_platform(platform);
        }
        for platform in &report.evicted {
            if !host.physics.remove_platform(platform.id) {
                log::trace!("No physics body for evicted platform {:?}", platform.id);
            }
        }
        if report.changed() {
            host.outputs.sync_platforms(self.world.platforms());
        }
        report
    }

    /// Release every platform and put each component back to its initial state
    fn teardown(&mut self, host: &mut Collaborators) {
        let released = self.world.clear(self.settings.world.start_y);
        for platform in &released {
            if !host.physics.remove_platform(platform.id) {
                log::trace!("No physics body for platform {:?} on teardown", platform.id);
            }
        }
        host.outputs.sync_platforms(&[]);

        self.generator.reset();
        self.window.reset();
        self.combo.reset();
        self.score.reset();
        self.danger.reset();
        self.player = PlayerState::default();
        self.backdrop = None;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.started = false;
    }
}
