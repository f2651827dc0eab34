//! World-space vectors, tile coordinates, and conversions between them.

use serde::{Deserialize, Serialize};

/// Side length of one tile in world units.
pub const TILE_SIZE: i32 = 32;

/// 2D world position (continuous, not tile-snapped).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Unit vector for a heading in degrees (0° points along +x).
    pub fn from_heading(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self {
            x: rad.cos(),
            y: rad.sin(),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Integer tile coordinate on the grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile coordinate containing a world position (floor division by tile size).
    pub fn of_world(pos: Vec2) -> Self {
        Self {
            x: (pos.x as i32).div_euclid(TILE_SIZE),
            y: (pos.y as i32).div_euclid(TILE_SIZE),
        }
    }

    /// World position of this tile's top-left corner.
    pub fn corner(&self) -> Vec2 {
        Vec2::new((self.x * TILE_SIZE) as f32, (self.y * TILE_SIZE) as f32)
    }

    /// World position of this tile's center.
    pub fn center(&self) -> Vec2 {
        let half = (TILE_SIZE / 2) as f32;
        self.corner() + Vec2::new(half, half)
    }

    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}
