//! Player movement state machine
//!
//! Runs once per tick on top of whatever the physics backend integrated.
//! Produces the velocity to write back plus a list of movement events for
//! effects and combo bookkeeping. Every accumulation is scaled by `dt`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::host::Touching;
use crate::consts::{SPAWN_X, SPAWN_Y};
use crate::settings::MovementSettings;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Vertical jump state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Airborne,
    /// Jump held after takeoff; `held_for` seconds so far
    Charging { held_for: f32 },
}

/// Which wall the player is in contact with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallContact {
    #[default]
    None,
    Left,
    Right,
}

/// Kinematic player state. Position/velocity mirror the physics body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub jump: JumpState,
    pub wall: WallContact,
    pub wall_sliding: bool,
    /// Continuous unsupported descent so far (seconds)
    pub fall_timer: f32,
    /// Set once `fall_timer` passes the threshold (visual only)
    pub is_falling: bool,
    /// Up was held on the previous tick (for rising-edge detection)
    pub up_was_held: bool,
    /// Whether the player was supported on the previous tick
    pub was_grounded: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::spawn(Vec2::new(SPAWN_X, SPAWN_Y))
    }
}

impl PlayerState {
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            jump: JumpState::Airborne,
            wall: WallContact::None,
            wall_sliding: false,
            fall_timer: 0.0,
            is_falling: false,
            up_was_held: false,
            was_grounded: false,
        }
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.jump, JumpState::Charging { .. })
    }
}

/// Held controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

/// Something worth telling effects / combo about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    /// Grounded takeoff; `power` is 1 + speed ratio
    Jumped { power: f32 },
    /// Pushed off a wall. The combo must be dropped before the velocity lands.
    WallJumped { from: WallContact },
    /// Sliding down a wall this tick
    WallSliding { wall: WallContact },
}

/// Applies the movement rules
#[derive(Debug, Clone)]
pub struct MovementController {
    settings: MovementSettings,
}

impl MovementController {
    pub fn new(settings: MovementSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    /// Horizontal speed cap for the current boost state
    pub fn max_speed(&self, speed_boost: bool) -> f32 {
        if speed_boost {
            self.settings.super_max_speed
        } else {
            self.settings.max_speed
        }
    }

    /// Takeoff velocity for a grounded jump (negative is up)
    pub fn jump_velocity(&self, vx: f32, combo: u32) -> f32 {
        let s = &self.settings;
        let momentum_bonus = (vx.abs() / s.max_speed) * s.momentum_bonus_cap;
        let combo_bonus = (combo as f32 * s.combo_bonus_per_level).min(s.combo_bonus_cap);
        s.min_jump_velocity - momentum_bonus - combo_bonus
    }

    /// Advance the state machine by `dt` seconds.
    ///
    /// `player.velocity` must already hold the backend's current velocity;
    /// on return it holds the velocity to write back.
    pub fn step(
        &self,
        player: &mut PlayerState,
        input: MoveInput,
        touching: Touching,
        combo: u32,
        speed_boost: bool,
        dt: f32,
    ) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        let s = &self.settings;

        self.track_fall(player, touching, dt);
        self.steer(player, input, speed_boost, dt);

        let rising_edge = input.up && !player.up_was_held;
        let mut took_off = false;

        if touching.down {
            if rising_edge && !player.is_charging() {
                let power = 1.0 + player.velocity.x.abs() / s.max_speed;
                player.velocity.y = self.jump_velocity(player.velocity.x, combo);
                player.jump = JumpState::Charging { held_for: 0.0 };
                events.push(MovementEvent::Jumped { power });
                took_off = true;
            } else if !player.is_charging() {
                player.jump = JumpState::Grounded;
            }
        } else if player.jump == JumpState::Grounded {
            player.jump = JumpState::Airborne;
        }

        // The takeoff tick leaves the jump at its base velocity
        if !took_off {
            self.charge(player, input, dt);
        }

        player.wall = match (touching.left, touching.right) {
            (true, _) => WallContact::Left,
            (_, true) => WallContact::Right,
            _ => WallContact::None,
        };
        player.wall_sliding = false;

        if !touching.down && player.wall != WallContact::None {
            if player.velocity.y > 0.0 {
                player.wall_sliding = true;
                player.velocity.y = player.velocity.y.min(s.wall_slide_speed);
                events.push(MovementEvent::WallSliding { wall: player.wall });
            }

            if input.up {
                let push = if player.wall == WallContact::Left { 1.0 } else { -1.0 };
                player.velocity = Vec2::new(push * s.wall_jump_force, s.wall_jump_velocity);
                player.facing = if push > 0.0 { Facing::Right } else { Facing::Left };
                player.jump = JumpState::Airborne;
                player.wall_sliding = false;
                events.push(MovementEvent::WallJumped { from: player.wall });
            }
        }

        player.up_was_held = input.up;
        events
    }

    /// Accelerate toward the held direction or bleed speed toward zero
    fn steer(&self, player: &mut PlayerState, input: MoveInput, speed_boost: bool, dt: f32) {
        let s = &self.settings;
        let cap = self.max_speed(speed_boost);
        let vx = player.velocity.x;

        player.velocity.x = if input.left {
            player.facing = Facing::Left;
            (vx - s.acceleration * dt).max(-cap)
        } else if input.right {
            player.facing = Facing::Right;
            (vx + s.acceleration * dt).min(cap)
        } else {
            let decel = s.deceleration * dt;
            if vx > 0.0 {
                (vx - decel).max(0.0)
            } else {
                (vx + decel).min(0.0)
            }
        };
    }

    /// Extra lift while the jump stays held during the ascent
    fn charge(&self, player: &mut PlayerState, input: MoveInput, dt: f32) {
        let s = &self.settings;
        let JumpState::Charging { held_for } = player.jump else {
            return;
        };

        if !input.up || player.velocity.y >= 0.0 {
            player.jump = JumpState::Airborne;
            return;
        }

        let held_for = held_for + dt;
        if held_for <= s.max_jump_hold_time {
            player.velocity.y -= s.jump_hold_boost * dt;
            player.jump = JumpState::Charging { held_for };
        } else {
            player.jump = JumpState::Airborne;
        }
    }

    /// Continuous fall timer; resets on support or upward motion
    fn track_fall(&self, player: &mut PlayerState, touching: Touching, dt: f32) {
        if player.velocity.y > 0.0 && !touching.down {
            player.fall_timer += dt;
            if player.fall_timer > self.settings.fall_duration_threshold {
                player.is_falling = true;
            }
        } else {
            player.fall_timer = 0.0;
            player.is_falling = false;
        }
    }
}
