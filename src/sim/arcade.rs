//! Headless arcade physics
//!
//! A small AABB backend standing in for the browser engine: constant gravity,
//! solid tower walls, a solid ground slab and one-way platforms the player
//! lands on from above. Good enough to drive full runs in tests and in the
//! native runner.

use std::collections::BTreeMap;

use glam::Vec2;

use super::host::{Physics, Support, Touching};
use super::world::{Platform, PlatformId};
use crate::consts::*;

#[derive(Debug, Clone, Copy)]
struct Slab {
    left: f32,
    right: f32,
    top: f32,
}

impl From<&Platform> for Slab {
    fn from(p: &Platform) -> Self {
        Slab {
            left: p.left(),
            right: p.right(),
            top: p.top(),
        }
    }
}

/// Arcade-style rigid body world with a single dynamic player box
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    position: Vec2,
    velocity: Vec2,
    half_size: Vec2,
    gravity: f32,
    touching: Touching,
    ground_top: f32,
    platforms: BTreeMap<PlatformId, Slab>,
}

impl Default for ArcadePhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadePhysics {
    pub fn new() -> Self {
        Self {
            position: Vec2::new(SPAWN_X, SPAWN_Y),
            velocity: Vec2::ZERO,
            half_size: Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
            gravity: GRAVITY,
            touching: Touching::default(),
            ground_top: GROUND_CENTER_Y - GROUND_THICKNESS / 2.0,
            platforms: BTreeMap::new(),
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn collider_count(&self) -> usize {
        self.platforms.len()
    }

    /// Integrate one step and resolve contacts
    pub fn step(&mut self, dt: f32) {
        let previous_bottom = self.position.y + self.half_size.y;

        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;

        let mut touching = Touching::default();

        // Walls
        if self.position.x - self.half_size.x < WALL_LEFT_X {
            self.position.x = WALL_LEFT_X + self.half_size.x;
            self.velocity.x = self.velocity.x.max(0.0);
            touching.left = true;
        } else if self.position.x + self.half_size.x > WALL_RIGHT_X {
            self.position.x = WALL_RIGHT_X - self.half_size.x;
            self.velocity.x = self.velocity.x.min(0.0);
            touching.right = true;
        }

        // Floors are only solid when falling onto them from above
        let bottom = self.position.y + self.half_size.y;
        if self.velocity.y >= 0.0 {
            let left = self.position.x - self.half_size.x;
            let right = self.position.x + self.half_size.x;

            let landed = self
                .platforms
                .iter()
                .filter(|(_, s)| right > s.left && left < s.right)
                .filter(|(_, s)| previous_bottom <= s.top && bottom >= s.top)
                // Highest surface crossed wins
                .min_by(|a, b| a.1.top.total_cmp(&b.1.top))
                .map(|(id, s)| (Support::Platform(*id), s.top));

            let ground = (previous_bottom <= self.ground_top && bottom >= self.ground_top)
                .then_some((Support::Ground, self.ground_top));

            if let Some((support, top)) = landed.or(ground) {
                self.position.y = top - self.half_size.y;
                self.velocity.y = 0.0;
                touching.down = true;
                touching.support = Some(support);
            }
        }

        self.touching = touching;
    }
}

impl Physics for ArcadePhysics {
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
        self.platforms.insert(platform.id, Slab::from(platform));
    }

    fn remove_platform(&mut self, id: PlatformId) -> bool {
        self.platforms.remove(&id).is_some()
    }

    fn place_player(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.touching = Touching::default();
    }
}
