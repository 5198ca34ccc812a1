//! Host collaborator interfaces
//!
//! The simulation never draws, polls devices or resolves collisions itself.
//! It reads contact state from a [`Physics`] backend and pushes everything
//! else out through fire-and-forget notifications.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::danger::DangerZone;
use super::movement::Facing;
use super::world::{Platform, PlatformId};

/// What the player is standing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    Ground,
    Platform(PlatformId),
}

/// Contact flags reported by the physics backend for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touching {
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Body under the player when `down` is set
    pub support: Option<Support>,
}

impl Touching {
    pub fn airborne(&self) -> bool {
        !self.down
    }
}

/// Backdrop band for the player's current height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackdropZone {
    Sky,
    HighSky,
    Dusk,
    Twilight,
    Space,
}

impl BackdropZone {
    /// 1000-height-unit bands; everything past the last clamps to `Space`
    pub fn for_height(height: u32) -> BackdropZone {
        match height {
            0..1000 => BackdropZone::Sky,
            1000..2000 => BackdropZone::HighSky,
            2000..3000 => BackdropZone::Dusk,
            3000..4000 => BackdropZone::Twilight,
            _ => BackdropZone::Space,
        }
    }
}

/// Visual sync
pub trait Renderer {
    /// Called only when the live platform set changed
    fn sync_platforms(&mut self, platforms: &[Platform]);
    /// Called every tick
    fn sync_player(&mut self, position: Vec2, velocity: Vec2, facing: Facing, is_falling: bool);
    /// Called when the player crosses into a new backdrop band
    fn sync_backdrop(&mut self, _zone: BackdropZone) {}
    /// Combo milestone celebration
    fn show_combo_popup(&mut self, _combo: u32) {}
    /// Called every tick while the hazard is active
    fn sync_danger_zone(&mut self, _zone: &DangerZone) {}
}

/// Physics backend. Owns collision detection and integration.
pub trait Physics {
    fn query_touching(&self) -> Touching;
    /// (position, velocity) of the player body
    fn body(&self) -> (Vec2, Vec2);
    fn set_velocity(&mut self, velocity: Vec2);
    fn apply_impulse(&mut self, impulse: Vec2) {
        let (_, velocity) = self.body();
        self.set_velocity(velocity + impulse);
    }
    /// Create a static collider for a freshly generated platform
    fn add_platform(&mut self, platform: &Platform);
    /// Release a collider. Returns false if no such body existed.
    fn remove_platform(&mut self, id: PlatformId) -> bool;
    /// Teleport the player body and zero its velocity
    fn place_player(&mut self, position: Vec2);
}

/// Particle / juice hooks. Intensity is roughly 0..=3.
pub trait Effects {
    fn on_jump(&mut self, _position: Vec2, _intensity: f32) {}
    fn on_land(&mut self, _position: Vec2, _intensity: f32) {}
    fn on_wall_slide(&mut self, _position: Vec2, _intensity: f32) {}
    fn on_combo(&mut self, _position: Vec2, _intensity: f32) {}
    fn on_danger_warning(&mut self, _position: Vec2, _intensity: f32) {}
    fn on_speed_trail(&mut self, _position: Vec2, _intensity: f32) {}
}

/// HUD / score sink
pub trait ScoreSink {
    fn on_height_changed(&mut self, _height: u32) {}
    fn on_combo_changed(&mut self, _combo: u32, _multiplier: f32) {}
    fn on_game_over(&mut self, _final_score: u32, _max_combo: u32) {}
}

/// Every notification interface at once. Implemented for anything that
/// implements all three.
pub trait Outputs: Renderer + Effects + ScoreSink {}

impl<T: Renderer + Effects + ScoreSink> Outputs for T {}

/// Everything a tick talks to
pub struct Collaborators<'a> {
    pub physics: &'a mut dyn Physics,
    pub outputs: &'a mut dyn Outputs,
}

impl<'a> Collaborators<'a> {
    pub fn new(physics: &'a mut dyn Physics, outputs: &'a mut dyn Outputs) -> Self {
        Self { physics, outputs }
    }
}

/// A recorded notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    PlatformsSynced { platforms: Vec<Platform> },
    Backdrop { zone: BackdropZone },
    ComboPopup { combo: u32 },
    Jump { position: Vec2, intensity: f32 },
    Land { position: Vec2, intensity: f32 },
    WallSlide { position: Vec2, intensity: f32 },
    Combo { position: Vec2, intensity: f32 },
    DangerWarning { position: Vec2, intensity: f32 },
    SpeedTrail { position: Vec2, intensity: f32 },
    HeightChanged { height: u32 },
    ComboChanged { combo: u32, multiplier: f32 },
    GameOver { final_score: u32, max_combo: u32 },
}

/// Latest per-tick render state (not queued: it changes every tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerFrame {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: i8,
    pub is_falling: bool,
}

/// Records every notification as a [`HostEvent`].
///
/// Used by the browser bridge (drained to JSON each frame) and by tests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventQueue {
    pub events: Vec<HostEvent>,
    pub player: PlayerFrame,
    pub danger_y: Option<f32>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued events
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Renderer for EventQueue {
    fn sync_platforms(&mut self, platforms: &[Platform]) {
        self.events.push(HostEvent::PlatformsSynced {
            platforms: platforms.to_vec(),
        });
    }

    fn sync_player(&mut self, position: Vec2, velocity: Vec2, facing: Facing, is_falling: bool) {
        self.player = PlayerFrame {
            position,
            velocity,
            facing: facing.sign() as i8,
            is_falling,
        };
    }

    fn sync_backdrop(&mut self, zone: BackdropZone) {
        self.events.push(HostEvent::Backdrop { zone });
    }

    fn show_combo_popup(&mut self, combo: u32) {
        self.events.push(HostEvent::ComboPopup { combo });
    }

    fn sync_danger_zone(&mut self, zone: &DangerZone) {
        self.danger_y = Some(zone.y);
    }
}

impl Effects for EventQueue {
    fn on_jump(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::Jump { position, intensity });
    }

    fn on_land(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::Land { position, intensity });
    }

    fn on_wall_slide(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::WallSlide { position, intensity });
    }

    fn on_combo(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::Combo { position, intensity });
    }

    fn on_danger_warning(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::DangerWarning { position, intensity });
    }

    fn on_speed_trail(&mut self, position: Vec2, intensity: f32) {
        self.events.push(HostEvent::SpeedTrail { position, intensity });
    }
}

impl ScoreSink for EventQueue {
    fn on_height_changed(&mut self, height: u32) {
        self.events.push(HostEvent::HeightChanged { height });
    }

    fn on_combo_changed(&mut self, combo: u32, multiplier: f32) {
        self.events.push(HostEvent::ComboChanged { combo, multiplier });
    }

    fn on_game_over(&mut self, final_score: u32, max_combo: u32) {
        self.events.push(HostEvent::GameOver {
            final_score,
            max_combo,
        });
    }
}

/// Physics state driven by an external engine.
///
/// The host writes the body and contact flags before each tick and reads
/// the velocity back afterwards. Collider changes are queued so the host can
/// mirror them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirroredBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub touching: Touching,
    /// Platforms created since the last drain
    pub added: Vec<Platform>,
    /// Platform colliders released since the last drain
    pub removed: Vec<PlatformId>,
    /// Teleport request for the host body
    pub placed: Option<Vec2>,
    live: Vec<PlatformId>,
}

impl MirroredBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host writes the current engine state
    pub fn set_state(&mut self, position: Vec2, velocity: Vec2, touching: Touching) {
        self.position = position;
        self.velocity = velocity;
        self.touching = touching;
    }

    pub fn live_colliders(&self) -> usize {
        self.live.len()
    }
}

impl Physics for MirroredBody {
    fn query_touching(&self) -> Touching {
        self.touching
    }

    fn body(&self) -> (Vec2, Vec2) {
        (self.position, self.velocity)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn add_platform(&mut self, platform: &Platform) {
        self.live.push(platform.id);
        self.added.push(*platform);
    }

    fn remove_platform(&mut self, id: PlatformId) -> bool {
        match self.live.iter().position(|live| *live == id) {
            Some(i) => {
                self.live.swap_remove(i);
                self.removed.push(id);
                true
            }
            None => false,
        }
    }

    fn place_player(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.placed = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::ZoneType;

    fn platform(id: u32) -> Platform {
        Platform {
            id: PlatformId(id),
            x: 300.0,
            y: 4000.0,
            width: 120.0,
            height: 28.0,
            zone: ZoneType::Lower,
        }
    }

    #[test]
    fn test_backdrop_bands() {
        assert_eq!(BackdropZone::for_height(0), BackdropZone::Sky);
        assert_eq!(BackdropZone::for_height(999), BackdropZone::Sky);
        assert_eq!(BackdropZone::for_height(1000), BackdropZone::HighSky);
        assert_eq!(BackdropZone::for_height(3999), BackdropZone::Twilight);
        assert_eq!(BackdropZone::for_height(9000), BackdropZone::Space);
    }

    #[test]
    fn test_mirrored_remove_unknown_is_noop() {
        let mut body = MirroredBody::new();
        body.add_platform(&platform(1));
        assert!(body.remove_platform(PlatformId(1)));
        assert!(!body.remove_platform(PlatformId(1)));
        assert!(!body.remove_platform(PlatformId(99)));
        assert_eq!(body.removed, vec![PlatformId(1)]);
        assert_eq!(body.live_colliders(), 0);
    }

    #[test]
    fn test_apply_impulse_adds_to_velocity() {
        let mut body = MirroredBody::new();
        body.set_state(Vec2::ZERO, Vec2::new(10.0, -20.0), Touching::default());
        body.apply_impulse(Vec2::new(5.0, -5.0));
        assert_eq!(body.velocity, Vec2::new(15.0, -25.0));
    }

    #[test]
    fn test_event_queue_serializes_tagged() {
        let mut queue = EventQueue::new();
        queue.on_height_changed(42);
        let json = serde_json::to_string(&queue.drain()).unwrap();
        assert_eq!(json, r#"[{"type":"height_changed","height":42}]"#);
        assert!(queue.events.is_empty());
    }
}
