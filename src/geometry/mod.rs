//! World-space geometry for module placement.
//!
//! Positions are continuous 2D coordinates (`glam::Vec2`). Connection points are
//! compared by [`PointKey`], an exact quantized form of a position, so that two
//! modules computing "the same" edge point through different float paths agree.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{OVERLAP_EPSILON, POINT_KEY_SCALE};

/// Cardinal direction of a module edge.
///
/// Iteration order everywhere in the crate is north, east, south, west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step in world space (+y is north)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::North => Vec2::Y,
            Direction::East => Vec2::X,
            Direction::South => Vec2::NEG_Y,
            Direction::West => Vec2::NEG_X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

/// Quarter-turn orientation around the z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation from signed degrees; anything off a quarter turn snaps down.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) / 90 {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => 90.0,
            Rotation::Deg180 => 180.0,
            Rotation::Deg270 => 270.0,
        }
    }

    /// True when the rotation exchanges the width and height axes
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Full width/height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub width: f32,
    pub height: f32,
}

impl Extents {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn rotated(self, rotation: Rotation) -> Self {
        if rotation.swaps_axes() {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }

    pub fn half(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned bounding box, stored as center + half size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, extents: Extents) -> Self {
        Self {
            center,
            half: extents.half(),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Interior overlap test. Boxes that only share an edge or a corner do not
    /// overlap; adjacent modules are placed exactly edge to edge.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x - OVERLAP_EPSILON
            && b_min.x < a_max.x - OVERLAP_EPSILON
            && a_min.y < b_max.y - OVERLAP_EPSILON
            && b_min.y < a_max.y - OVERLAP_EPSILON
    }
}

/// Exact, hashable form of a world position used for connection point identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointKey {
    x: i64,
    y: i64,
}

impl From<Vec2> for PointKey {
    fn from(p: Vec2) -> Self {
        Self {
            x: (p.x * POINT_KEY_SCALE).round() as i64,
            y: (p.y * POINT_KEY_SCALE).round() as i64,
        }
    }
}

/// Coordinate equality at connection point resolution
pub fn same_point(a: Vec2, b: Vec2) -> bool {
    PointKey::from(a) == PointKey::from(b)
}
