//! Connection registry: the open edge points growth can attach to.
//!
//! Rebuilt from scratch after every structural change. The first module to
//! claim a coordinate owns it; later claimants of the same coordinate are
//! dropped, so two coincident open edges collapse into one point.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, PointKey};
use crate::module::{ModuleId, Tag};
use crate::world::World;

/// An open edge point and the module that owns it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub position: Vec2,
    pub anchor: ModuleId,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    points: Vec<ConnectionPoint>,
    owners: HashMap<PointKey, ModuleId>,
}

impl ConnectionRegistry {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in discovery order
    pub fn points(&self) -> &[ConnectionPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&ConnectionPoint> {
        self.points.get(index)
    }

    pub fn owner_of(&self, position: Vec2) -> Option<ModuleId> {
        self.owners.get(&PointKey::from(position)).copied()
    }

    /// Register `position` for `anchor` unless the coordinate is already taken
    fn claim(&mut self, position: Vec2, anchor: ModuleId) -> bool {
        let key = PointKey::from(position);
        if self.owners.contains_key(&key) {
            return false;
        }
        self.owners.insert(key, anchor);
        self.points.push(ConnectionPoint { position, anchor });
        true
    }

    fn clear(&mut self) {
        self.points.clear();
        self.owners.clear();
    }
}

/// Discard unplaced litter, then register every open edge of every placed room
/// and hall (rooms first, each group in creation order; edges N, E, S, W).
pub fn rebuild(world: &mut World) -> &ConnectionRegistry {
    let collected = world.collect_garbage();

    let scan: Vec<(ModuleId, Vec2)> = [Tag::Room, Tag::Hall]
        .into_iter()
        .flat_map(|tag| world.tagged(tag).collect::<Vec<_>>())
        .filter_map(|id| world.get(id))
        .filter(|m| m.is_placed())
        .flat_map(|m| {
            Direction::ALL
                .into_iter()
                .filter(move |dir| !m.flags.get(*dir))
                .map(move |dir| (m.id, m.scan_point(dir)))
        })
        .collect();

    let registry = world.registry_mut();
    registry.clear();
    let mut dropped = 0usize;
    for (anchor, position) in scan {
        if !registry.claim(position, anchor) {
            dropped += 1;
        }
    }

    tracing::trace!(
        points = registry.len(),
        dropped,
        collected,
        "connection registry rebuilt"
    );
    world.registry()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ModuleTemplate};
    use crate::geometry::Rotation;
    use crate::module::ModuleKind;
    use crate::oracle::CollisionSpace;

    fn template(exits: &[Direction]) -> ModuleTemplate {
        ModuleTemplate::square("t", ModuleKind::FourExit, 1.0, exits).without_floor()
    }

    #[test]
    fn test_four_exit_seed_has_four_points() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        let seed = world.place_seed(&template(&Direction::ALL), Vec2::ZERO, &mut space);
        let registry = rebuild(&mut world);

        let positions: Vec<Vec2> = registry.points().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(0.0, 2.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(0.0, -2.0),
                Vec2::new(-2.0, 0.0),
            ]
        );
        assert!(registry.points().iter().all(|p| p.anchor == seed));
        assert_eq!(registry.owner_of(Vec2::new(2.0, 0.0)), Some(seed));
        assert_eq!(registry.owner_of(Vec2::new(3.0, 0.0)), None);
    }

    #[test]
    fn test_closed_edges_produce_no_points() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        world.place_seed(&template(&[Direction::East]), Vec2::ZERO, &mut space);
        let registry = rebuild(&mut world);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.points()[0].position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_coincident_points_first_claimant_wins() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        let first = world.place_seed(&template(&[Direction::East]), Vec2::ZERO, &mut space);
        // second room four units east; its west point lands on the seed's east point
        let second = world.spawn(&template(&[Direction::West]), Category::Room);
        world.commit(second, Vec2::new(4.0, 0.0), Rotation::Deg0, &mut space);

        let registry = rebuild(&mut world);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.points()[0].anchor, first);
    }

    #[test]
    fn test_rebuild_collects_litter_and_skips_unplaced() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        world.place_seed(&template(&[Direction::North]), Vec2::ZERO, &mut space);
        let pending = world.spawn(&template(&Direction::ALL), Category::Room);
        let registry = rebuild(&mut world);
        assert_eq!(registry.len(), 1);
        assert!(world.get(pending).is_none());
    }

    #[test]
    fn test_rooms_scanned_before_halls() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        let hall = world.spawn(&template(&[Direction::North]), Category::Corridor);
        world.commit(hall, Vec2::new(10.0, 0.0), Rotation::Deg0, &mut space);
        let room = world.spawn(&template(&[Direction::North]), Category::Room);
        world.commit(room, Vec2::new(-10.0, 0.0), Rotation::Deg0, &mut space);

        let registry = rebuild(&mut world);
        let anchors: Vec<ModuleId> = registry.points().iter().map(|p| p.anchor).collect();
        assert_eq!(anchors, vec![room, hall]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        world.place_seed(&template(&Direction::ALL), Vec2::ZERO, &mut space);
        let first: Vec<ConnectionPoint> = rebuild(&mut world).points().to_vec();
        let second: Vec<ConnectionPoint> = rebuild(&mut world).points().to_vec();
        assert_eq!(first, second);
    }
}
