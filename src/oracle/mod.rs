//! Spatial occupancy oracle: the only judge of whether a placement is legal.
//!
//! The world reports every committed blocking module through
//! [`OccupancyOracle::insert`], so an implementation can keep its own index of
//! placed geometry. [`CollisionSpace`] is the in-crate implementation.

use glam::Vec2;

use crate::geometry::{Aabb, Extents};
use crate::module::ModuleId;

pub trait OccupancyOracle {
    /// True if a box of `extents` centered on `center` overlaps blocking geometry
    fn is_occupied(&self, center: Vec2, extents: Extents) -> bool;

    /// A blocking module was committed with these bounds
    fn insert(&mut self, _id: ModuleId, _bounds: Aabb) {}

    /// A module left the world
    fn remove(&mut self, _id: ModuleId) {}
}

/// Flat list of placed bodies, scanned linearly on every query.
#[derive(Debug, Clone, Default)]
pub struct CollisionSpace {
    bodies: Vec<(ModuleId, Aabb)>,
}

impl CollisionSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &(ModuleId, Aabb)> {
        self.bodies.iter()
    }

    /// First body overlapping the query box, if any
    pub fn first_hit(&self, query: &Aabb) -> Option<ModuleId> {
        self.bodies
            .iter()
            .find(|(_, bounds)| bounds.overlaps(query))
            .map(|(id, _)| *id)
    }
}

impl OccupancyOracle for CollisionSpace {
    fn is_occupied(&self, center: Vec2, extents: Extents) -> bool {
        self.first_hit(&Aabb::new(center, extents)).is_some()
    }

    fn insert(&mut self, id: ModuleId, bounds: Aabb) {
        self.bodies.push((id, bounds));
    }

    fn remove(&mut self, id: ModuleId) {
        self.bodies.retain(|(body, _)| *body != id);
    }
}

/// Oracle that reports every box as occupied
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOccupied;

impl OccupancyOracle for AlwaysOccupied {
    fn is_occupied(&self, _center: Vec2, _extents: Extents) -> bool {
        true
    }
}
