//! Browser bindings
//!
//! The page owns the physics engine and the renderer. Every frame it writes
//! the engine's player body into the bridge, calls [`WebGame::tick`] and
//! applies the returned frame: the velocity to set, collider changes and the
//! queued effect / HUD events.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::host::PlayerFrame;
use crate::sim::{
    Collaborators, EventQueue, HostEvent, MirroredBody, Platform, PlatformId, Simulation, Snapshot,
    Support, TickInput, Touching, tick,
};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialised on hot reload; keep the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Tower Climber core loaded");
}

/// Everything the page needs to apply after a call
#[derive(Serialize)]
struct Frame {
    velocity: Vec2,
    placed: Option<Vec2>,
    added: Vec<Platform>,
    removed: Vec<PlatformId>,
    events: Vec<HostEvent>,
    player: PlayerFrame,
    danger_y: Option<f32>,
    snapshot: Snapshot,
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One run, bridged to a JS physics engine
#[wasm_bindgen]
pub struct WebGame {
    sim: Simulation,
    body: MirroredBody,
    queue: EventQueue,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// New run with default tuning. JS numbers are truncated to a u64 seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        Self::build(seed as u64, Settings::default())
    }

    /// New run with tuning overrides (partial JSON is fine)
    pub fn with_settings(seed: f64, settings_json: &str) -> Result<WebGame, JsValue> {
        let settings = Settings::from_json(settings_json).map_err(js_error)?;
        Ok(Self::build(seed as u64, settings))
    }

    /// Default tuning as JSON, for tuning panels
    pub fn default_settings() -> Result<String, JsValue> {
        Settings::default().to_json().map_err(js_error)
    }

    /// Build the first stretch of tower. Returns the frame JSON.
    pub fn start(&mut self) -> Result<String, JsValue> {
        self.sim
            .start(&mut Collaborators::new(&mut self.body, &mut self.queue));
        self.frame()
    }

    /// Engine body state for the coming tick
    pub fn set_body(&mut self, x: f32, y: f32, vx: f32, vy: f32) {
        self.body.position = Vec2::new(x, y);
        self.body.velocity = Vec2::new(vx, vy);
    }

    /// Contact flags for the coming tick.
    ///
    /// `support` is the id of the body under the player: 0 for the ground,
    /// a platform id, or negative for nothing known.
    pub fn set_touching(&mut self, down: bool, left: bool, right: bool, support: i32) {
        let support = match support {
            s if s < 0 => None,
            0 => Some(Support::Ground),
            id => Some(Support::Platform(PlatformId(id as u32))),
        };
        self.body.touching = Touching {
            down,
            left,
            right,
            support: support.filter(|_| down),
        };
    }

    /// Held controls for the coming tick
    pub fn set_input(&mut self, left: bool, right: bool, up: bool, restart: bool) {
        self.input = TickInput {
            left,
            right,
            up,
            restart,
        };
    }

    /// Advance one frame. Returns the frame JSON.
    pub fn tick(&mut self, dt: f32, now_ms: f64) -> Result<String, JsValue> {
        tick(
            &mut self.sim,
            &self.input,
            dt,
            now_ms / 1000.0,
            &mut Collaborators::new(&mut self.body, &mut self.queue),
        );
        self.frame()
    }

    pub fn is_game_over(&self) -> bool {
        self.sim.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.sim.score.score()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.snapshot()).map_err(js_error)
    }
}

impl WebGame {
    fn build(seed: u64, settings: Settings) -> Self {
        Self {
            sim: Simulation::new(seed, settings),
            body: MirroredBody::new(),
            queue: EventQueue::new(),
            input: TickInput::default(),
        }
    }

    fn frame(&mut self) -> Result<String, JsValue> {
        let frame = Frame {
            velocity: self.body.velocity,
            placed: self.body.placed.take(),
            added: std::mem::take(&mut self.body.added),
            removed: std::mem::take(&mut self.body.removed),
            events: self.queue.drain(),
            player: self.queue.player,
            danger_y: self.queue.danger_y,
            snapshot: self.sim.snapshot(),
        };
        serde_json::to_string(&frame).map_err(js_error)
    }
}
