//! Placeable dungeon modules and their connection state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::SCAN_FACTOR;
use crate::geometry::{Aabb, Direction, Extents, Rotation};

/// Stable handle to a module inside a [`crate::world::World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shape family of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Corridor,
    Cap,
    FourExit,
    ThreeExit,
    TwoExit,
    Wall,
    Floor,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corridor => "corridor",
            Self::Cap => "cap",
            Self::FourExit => "four_exit",
            Self::ThreeExit => "three_exit",
            Self::TwoExit => "two_exit",
            Self::Wall => "wall",
            Self::Floor => "floor",
        }
    }
}

/// Classification used by the registry and the wall-fill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Room,
    Hall,
    Cap,
    Wall,
    Floor,
}

impl Tag {
    pub const ALL: [Tag; 5] = [Tag::Room, Tag::Hall, Tag::Cap, Tag::Wall, Tag::Floor];

    /// Whether modules with this tag count as occupied space for the oracle.
    /// Floor tiles sit inside their owner's bounds and never block on their own.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Tag::Floor)
    }
}

/// Per-edge connection state. `true` means the edge is closed: either a wall
/// by design or already matched to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionFlags {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl ConnectionFlags {
    /// All four edges closed
    pub const SEALED: ConnectionFlags = ConnectionFlags {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Flags for a module whose listed edges are exits and all others are walls
    pub fn with_exits(exits: &[Direction]) -> Self {
        let mut flags = Self::SEALED;
        for dir in exits {
            flags.set(*dir, false);
        }
        flags
    }

    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn set(&mut self, dir: Direction, value: bool) {
        match dir {
            Direction::North => self.north = value,
            Direction::East => self.east = value,
            Direction::South => self.south = value,
            Direction::West => self.west = value,
        }
    }

    pub fn count_set(&self) -> usize {
        Direction::ALL.iter().filter(|d| self.get(**d)).count()
    }

    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| !self.get(*d))
    }

    pub fn all_set(&self) -> bool {
        self.count_set() == 4
    }
}

/// Lifecycle of a module instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementState {
    /// Instantiated, not yet at a legal position
    #[default]
    Pending,
    Placed,
    /// Failed its placement attempt; collected on the next registry rebuild
    Rejected,
}

/// A live module instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub template: String,
    pub kind: ModuleKind,
    pub tag: Tag,
    pub flags: ConnectionFlags,
    /// Half-extent to the connecting edge
    pub connection_offset: f32,
    pub width: f32,
    pub height: f32,
    /// Only meaningful once `state` is `Placed`
    pub position: Vec2,
    pub rotation: Rotation,
    pub state: PlacementState,
    pub has_floor: bool,
    /// Owning module for floor tiles
    pub parent: Option<ModuleId>,
}

impl Module {
    pub fn is_placed(&self) -> bool {
        self.state == PlacementState::Placed
    }

    pub fn placed_position(&self) -> Option<Vec2> {
        self.is_placed().then_some(self.position)
    }

    /// Unrotated box size, as used for occupancy queries before placement
    pub fn extents(&self) -> Extents {
        Extents::new(self.width, self.height)
    }

    /// World bounds at the current position and rotation
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.extents().rotated(self.rotation))
    }

    /// Coarse edge point used by the registry and the growth scan
    pub fn scan_point(&self, dir: Direction) -> Vec2 {
        self.position + dir.unit() * (self.connection_offset * SCAN_FACTOR)
    }

    /// Final center of a neighbor with `neighbor_offset` attached on `dir`
    pub fn attach_point(&self, dir: Direction, neighbor_offset: f32) -> Vec2 {
        self.position + dir.unit() * (self.connection_offset + neighbor_offset)
    }
}
