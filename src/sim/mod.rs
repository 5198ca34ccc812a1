//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, settings, inputs and
//! collaborator answers, a run plays out identically:
//! - Explicit `dt` and `now`, sampled once per tick by the caller
//! - Seeded RNG only
//! - Stable iteration order (platforms by creation order)
//! - No rendering, input or engine dependencies

pub mod arcade;
pub mod combo;
pub mod danger;
pub mod generator;
pub mod host;
pub mod movement;
pub mod rng;
pub mod score;
pub mod state;
pub mod tick;
pub mod window;
pub mod world;

#[cfg(test)]
mod scenarios;

pub use arcade::ArcadePhysics;
pub use combo::{ComboEngine, ComboLanding, ComboState};
pub use danger::DangerZone;
pub use generator::WorldGenerator;
pub use host::{
    BackdropZone, Collaborators, Effects, EventQueue, HostEvent, MirroredBody, Outputs, Physics,
    Renderer, ScoreSink, Support, Touching,
};
pub use movement::{Facing, JumpState, MoveInput, MovementController, PlayerState, WallContact};
pub use rng::{PcgSource, RandomSource, SequenceSource};
pub use score::{ScoreState, ScoreTracker};
pub use state::{GamePhase, Simulation, Snapshot};
pub use tick::{TickInput, tick};
pub use window::{WindowManager, WindowReport};
pub use world::{Platform, PlatformId, World, ZoneType};
