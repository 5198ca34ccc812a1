//! Whole-run scenarios: the simulation driven through real collaborators
//! for thousands of ticks

use glam::Vec2;
use proptest::prelude::*;

use super::arcade::ArcadePhysics;
use super::host::{Collaborators, EventQueue, HostEvent, MirroredBody, Physics, Touching};
use super::rng::{RandomSource, SequenceSource};
use super::state::{GamePhase, Simulation};
use super::tick::{TickInput, tick};
use super::world::PlatformId;
use crate::consts::*;
use crate::settings::Settings;

const DT: f32 = FRAME_DT;

/// Scripted climb: the body rises `rate` units per tick, never touching anything
fn climb<R: RandomSource>(
    sim: &mut Simulation<R>,
    body: &mut MirroredBody,
    queue: &mut EventQueue,
    ticks: u32,
    rate: f32,
    mut each: impl FnMut(&Simulation<R>, &MirroredBody),
) {
    let mut y = SPAWN_Y;
    let mut now = 0.0;
    for _ in 0..ticks {
        y -= rate;
        body.set_state(Vec2::new(SPAWN_X, y), Vec2::new(0.0, -rate / DT), Touching::default());
        now += DT as f64;
        tick(
            sim,
            &TickInput::default(),
            DT,
            now,
            &mut Collaborators::new(&mut *body, &mut *queue),
        );
        // Keep the hazard just out of reach
        sim.danger.y = y + 400.0;
        queue.drain();
        each(sim, body);
    }
}

#[test]
fn test_live_platforms_stay_bounded_over_long_climb() {
    let mut sim = Simulation::new(2024, Settings::default());
    let mut body = MirroredBody::new();
    let mut queue = EventQueue::new();
    let bound = sim.window.live_bound(sim.settings.world.base_spacing);
    let mut worst = 0;

    climb(&mut sim, &mut body, &mut queue, 10_000, 4.0, |sim, body| {
        assert!(sim.world.len() <= bound, "{} live > bound {}", sim.world.len(), bound);
        assert_eq!(body.live_colliders(), sim.world.len());
        worst = worst.max(sim.world.len());
    });

    assert!(worst > 0);
    assert!(sim.world.total_generated() as usize > bound);
    // The ground is never part of the evictable set
    assert!(sim.world.get(PlatformId::GROUND).is_some());
}

#[test]
fn test_ceiling_and_spacing_over_whole_tower() {
    let mut sim = Simulation::with_rng(7, Settings::default(), SequenceSource::new(vec![0.1, 0.9, 0.4]));
    let mut body = MirroredBody::new();
    let mut queue = EventQueue::new();

    // Fast enough to run past the ceiling
    climb(&mut sim, &mut body, &mut queue, 6_000, 9.0, |_, _| {});

    let ceiling = sim.settings.world.min_platform_y;
    let base = sim.settings.world.base_spacing;
    let all = &body.added;
    assert!(sim.world.highest_y() > ceiling);
    assert!(all.iter().all(|p| p.y > ceiling));
    // Nothing left to generate
    assert!(!sim.generator.can_generate(&sim.world));

    let mut last_gap = 0.0f32;
    for pair in all.windows(2) {
        let gap = pair[0].y - pair[1].y;
        assert!(gap >= base, "gap {} below base spacing", gap);
        assert!(gap >= last_gap, "spacing shrank: {} -> {}", last_gap, gap);
        last_gap = gap;
    }
    assert!(last_gap > base);
}

#[test]
fn test_restart_after_game_over_rebuilds_cleanly() {
    let mut sim = Simulation::new(11, Settings::default());
    let mut physics = ArcadePhysics::new();
    let mut queue = EventQueue::new();

    let mut now = 0.0;
    for _ in 0..60 {
        now += DT as f64;
        tick(&mut sim, &TickInput::default(), DT, now, &mut Collaborators::new(&mut physics, &mut queue));
        physics.step(DT);
    }
    assert_eq!(physics.collider_count(), sim.world.len());

    sim.danger.active = true;
    sim.danger.y = 4850.0;
    now += DT as f64;
    tick(&mut sim, &TickInput::default(), DT, now, &mut Collaborators::new(&mut physics, &mut queue));
    assert_eq!(sim.phase, GamePhase::GameOver);
    assert_eq!(queue.count(|e| matches!(e, HostEvent::GameOver { .. })), 1);
    queue.drain();

    let old_seed = sim.seed;
    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    now += DT as f64;
    tick(&mut sim, &restart, DT, now, &mut Collaborators::new(&mut physics, &mut queue));

    assert_eq!(sim.phase, GamePhase::Playing);
    assert_ne!(sim.seed, old_seed);
    assert_eq!(physics.collider_count(), sim.world.len());
    assert_eq!(physics.body(), (Vec2::new(SPAWN_X, SPAWN_Y), Vec2::ZERO));
    assert_eq!(sim.combo.state().max_combo, 0);
    assert!(!sim.danger.active);
    assert!(matches!(
        queue.events.first(),
        Some(HostEvent::PlatformsSynced { platforms }) if platforms.is_empty()
    ));
}

#[test]
fn test_settings_override_batch_size() {
    let settings = Settings::from_json(r#"{"window": {"batch": 3}}"#).unwrap();
    let mut sim = Simulation::new(5, settings);
    let mut body = MirroredBody::new();
    let mut queue = EventQueue::new();
    sim.start(&mut Collaborators::new(&mut body, &mut queue));
    body.added.clear();

    // Top of the tower well inside the lookahead
    sim.player.position.y = sim.world.highest_y() + 500.0;
    let report = sim.refresh_window(&mut Collaborators::new(&mut body, &mut queue));
    assert_eq!(report.generated.len(), 3);
    assert_eq!(body.added.len(), report.generated.len());
}

fn idle_landing_run(seed: u64) -> String {
    let mut sim = Simulation::new(seed, Settings::default());
    let mut physics = ArcadePhysics::new();
    let mut queue = EventQueue::new();
    let mut now = 0.0;
    for i in 0..600u32 {
        let input = TickInput {
            right: i % 200 < 60,
            left: (100..160).contains(&(i % 200)),
            up: i % 30 < 10,
            restart: false,
        };
        now += DT as f64;
        tick(&mut sim, &input, DT, now, &mut Collaborators::new(&mut physics, &mut queue));
        physics.step(DT);
    }
    serde_json::to_string(&queue.events).unwrap()
}

#[test]
fn test_event_stream_is_reproducible() {
    assert_eq!(idle_landing_run(99), idle_landing_run(99));
}

#[test]
fn test_arcade_run_lands_and_jumps() {
    let mut sim = Simulation::new(3, Settings::default());
    let mut physics = ArcadePhysics::new();
    let mut queue = EventQueue::new();
    let mut now = 0.0;
    let jump = TickInput {
        up: true,
        ..Default::default()
    };

    // Fall onto the ground
    for _ in 0..60 {
        now += DT as f64;
        tick(&mut sim, &TickInput::default(), DT, now, &mut Collaborators::new(&mut physics, &mut queue));
        physics.step(DT);
    }
    assert_eq!(queue.count(|e| matches!(e, HostEvent::Land { .. })), 1);
    assert!(physics.query_touching().down);

    now += DT as f64;
    tick(&mut sim, &jump, DT, now, &mut Collaborators::new(&mut physics, &mut queue));
    assert_eq!(physics.body().1.y, -400.0);
    physics.step(DT);
    assert!(!physics.query_touching().down);
    assert_eq!(queue.count(|e| matches!(e, HostEvent::Jump { .. })), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_score_and_height_never_drop(
        seed in any::<u64>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 100..400)
    ) {
        let mut sim = Simulation::new(seed, Settings::default());
        let mut physics = ArcadePhysics::new();
        let mut queue = EventQueue::new();
        let mut now = 0.0;
        let mut last = sim.score.state();

        for (left, right, up) in inputs {
            let input = TickInput { left, right, up, restart: false };
            now += DT as f64;
            tick(&mut sim, &input, DT, now, &mut Collaborators::new(&mut physics, &mut queue));
            physics.step(DT);
            queue.drain();

            let state = sim.score.state();
            prop_assert!(state.score >= last.score);
            prop_assert!(state.current_height >= last.current_height);
            prop_assert!(sim.combo.state().max_combo >= sim.combo.combo());
            prop_assert_eq!(physics.collider_count(), sim.world.len());
            last = state;
        }
    }
}
