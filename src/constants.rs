//! Centralized constants for the dungeon growth core.
//!
//! Per-module tuning (catalog shapes, tracing filters) stays with its module;
//! values shared between the passes and the generator live here.

// =====================================================
// Geometry
// =====================================================

/// Quantization scale for connection point identity (1/1024 world unit)
pub const POINT_KEY_SCALE: f32 = 1024.0;

/// Slack subtracted from box edges before an overlap test so that modules placed
/// edge to edge never register as colliding through float rounding
pub const OVERLAP_EPSILON: f32 = 1.0e-3;

/// Neighbor step of the wall-gap fill pass, in world units (one floor tile)
pub const WALL_STEP: f32 = 1.0;

/// Side length of a floor tile
pub const FLOOR_TILE_SIZE: f32 = 1.0;

/// Scan distance multiplier: open edge points sit at `offset * SCAN_FACTOR`
pub const SCAN_FACTOR: f32 = 2.0;

// =====================================================
// Growth loop
// =====================================================

/// Default number of room placement attempts
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Default corridor cadence: one corridor attempt every third iteration
pub const DEFAULT_CORRIDOR_INTERVAL: u32 = 3;

/// Default delay between growth iterations (interactive pacing only)
pub const DEFAULT_PACING_DELAY_MS: u64 = 0;

/// Default pause between capping and wall fill (interactive pacing only)
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

// =====================================================
// Rotation (degrees)
// =====================================================

/// Growth placements attached to a north/south edge are turned a quarter
pub const GROWTH_ROTATION_VERTICAL: i32 = 90;
pub const GROWTH_ROTATION_HORIZONTAL: i32 = 0;

/// Caps face back toward their anchor
pub const CAP_ROTATION_NORTH: i32 = -90;
pub const CAP_ROTATION_EAST: i32 = 180;
pub const CAP_ROTATION_SOUTH: i32 = 90;
pub const CAP_ROTATION_WEST: i32 = 0;
