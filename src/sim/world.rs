//! Live world data: platforms, zone tags and the ground
//!
//! The world only stores data. Generation decides where platforms go, the
//! window decides when they leave, and the host decides how they look.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::height_at;

/// Stable platform identity (0 is reserved for the ground)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

impl PlatformId {
    pub const GROUND: PlatformId = PlatformId(0);

    pub fn is_ground(self) -> bool {
        self == Self::GROUND
    }
}

/// Height band classification for a platform.
///
/// Purely a tag: the host maps it to a texture or color, gameplay ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    Base,
    Lower,
    Middle,
    Upper,
    Summit,
}

/// Height bands, `[min, max)` in height units, lowest first
const ZONE_BANDS: [(u32, u32, ZoneType); 5] = [
    (0, 100, ZoneType::Base),
    (100, 500, ZoneType::Lower),
    (500, 2000, ZoneType::Middle),
    (2000, 4000, ZoneType::Upper),
    (4000, 10000, ZoneType::Summit),
];

impl ZoneType {
    /// Zone for a height. Heights past the last band clamp to the top tier.
    pub fn for_height(height: u32) -> ZoneType {
        ZONE_BANDS
            .iter()
            .find(|(min, max, _)| height >= *min && height < *max)
            .map(|(_, _, zone)| *zone)
            .unwrap_or(ZoneType::Summit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Base => "base",
            ZoneType::Lower => "lower",
            ZoneType::Middle => "middle",
            ZoneType::Upper => "upper",
            ZoneType::Summit => "summit",
        }
    }
}

/// A static platform (center-anchored box)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub zone: ZoneType,
}

impl Platform {
    /// y of the walkable surface
    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Height units of this platform's center
    pub fn height_units(&self) -> u32 {
        height_at(self.y)
    }
}

/// All live platforms, ordered bottom to top.
///
/// Creation order is vertical order: every push must sit strictly above the
/// previous platform, so anything evictable is always a prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    ground: Platform,
    platforms: Vec<Platform>,
    /// y of the most recently generated platform (the generation cursor)
    highest_y: f32,
    next_id: u32,
    /// Platforms created this run, including evicted ones
    total_generated: u64,
}

impl World {
    /// Empty world with the generation cursor at `start_y`
    pub fn new(start_y: f32) -> Self {
        Self {
            ground: Platform {
                id: PlatformId::GROUND,
                x: GROUND_CENTER_X,
                y: GROUND_CENTER_Y,
                width: GROUND_WIDTH,
                height: GROUND_THICKNESS,
                zone: ZoneType::Base,
            },
            platforms: Vec::new(),
            highest_y: start_y,
            next_id: 1,
            total_generated: 0,
        }
    }

    pub fn ground(&self) -> &Platform {
        &self.ground
    }

    /// Live platforms, bottom first
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn highest_y(&self) -> f32 {
        self.highest_y
    }

    pub fn total_generated(&self) -> u64 {
        self.total_generated
    }

    /// Look up a live platform (the ground included)
    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        if id.is_ground() {
            return Some(&self.ground);
        }
        // Ids are allocated in creation order, which is also storage order
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.platforms[i])
    }

    pub fn contains(&self, id: PlatformId) -> bool {
        self.get(id).is_some()
    }

    /// Append a platform above the current cursor and advance the cursor.
    pub(crate) fn push(&mut self, x: f32, y: f32, width: f32, height: f32) -> Platform {
        debug_assert!(y < self.highest_y, "platforms must be generated upward");
        let platform = Platform {
            id: PlatformId(self.next_id),
            x,
            y,
            width,
            height,
            zone: ZoneType::for_height(height_at(y)),
        };
        self.next_id += 1;
        self.total_generated += 1;
        self.highest_y = y;
        self.platforms.push(platform);
        platform
    }

    /// Remove every platform whose center sits below `threshold_y` (larger y)
    pub(crate) fn evict_below(&mut self, threshold_y: f32) -> Vec<Platform> {
        let count = self.platforms.partition_point(|p| p.y > threshold_y);
        self.platforms.drain(..count).collect()
    }

    /// Drop every platform and rewind the cursor for a fresh run
    pub(crate) fn clear(&mut self, start_y: f32) -> Vec<Platform> {
        self.highest_y = start_y;
        self.next_id = 1;
        self.total_generated = 0;
        std::mem::take(&mut self.platforms)
    }
}
