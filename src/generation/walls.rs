//! Wall-gap fill: close every floor tile edge that opens onto empty space.
//!
//! Works at floor-tile granularity: neighbors are one unit away regardless of
//! the owning module's connection offset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ModuleCatalog};
use crate::constants::WALL_STEP;
use crate::geometry::{Direction, Rotation};
use crate::module::Tag;
use crate::oracle::OccupancyOracle;
use crate::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallReport {
    pub floor_tiles: usize,
    pub walls_placed: usize,
}

/// Place a wall in every free neighbor cell of every floor tile
pub fn fill_gaps<O: OccupancyOracle>(
    world: &mut World,
    oracle: &mut O,
    catalog: &ModuleCatalog,
) -> WallReport {
    let Some(wall) = catalog.wall() else {
        tracing::warn!("wall fill skipped: catalog has no wall template");
        return WallReport::default();
    };

    let tiles: Vec<Vec2> = world
        .tagged(Tag::Floor)
        .filter_map(|id| world.get(id).and_then(|m| m.placed_position()))
        .collect();
    let mut report = WallReport {
        floor_tiles: tiles.len(),
        walls_placed: 0,
    };

    for tile in tiles {
        for dir in Direction::ALL {
            let cell = tile + dir.unit() * WALL_STEP;
            let instance = world.spawn(wall, Category::Wall);
            if oracle.is_occupied(cell, wall.extents()) {
                world.discard(instance);
            } else {
                world.commit(instance, cell, Rotation::Deg0, oracle);
                report.walls_placed += 1;
            }
        }
    }

    tracing::info!(
        floor_tiles = report.floor_tiles,
        walls = report.walls_placed,
        "wall fill complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModuleTemplate;
    use crate::module::ModuleKind;
    use crate::oracle::{AlwaysOccupied, CollisionSpace};

    #[test]
    fn test_isolated_tile_gets_four_walls() {
        let catalog = ModuleCatalog::standard();
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        world.spawn_floor_tile(Vec2::new(0.5, 0.5), None);

        let report = fill_gaps(&mut world, &mut space, &catalog);
        assert_eq!(report.floor_tiles, 1);
        assert_eq!(report.walls_placed, 4);
        let walls: Vec<Vec2> = world
            .tagged(Tag::Wall)
            .filter_map(|id| world.get(id))
            .map(|m| m.position)
            .collect();
        assert_eq!(
            walls,
            vec![
                Vec2::new(0.5, 1.5),
                Vec2::new(1.5, 0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(-0.5, 0.5),
            ]
        );
        assert_eq!(space.len(), 4);
    }

    #[test]
    fn test_shared_neighbor_gets_one_wall() {
        let catalog = ModuleCatalog::standard();
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        // two tiles two cells apart share the cell between them
        world.spawn_floor_tile(Vec2::new(0.5, 0.5), None);
        world.spawn_floor_tile(Vec2::new(2.5, 0.5), None);

        let report = fill_gaps(&mut world, &mut space, &catalog);
        assert_eq!(report.walls_placed, 7);
    }

    #[test]
    fn test_room_interior_gets_no_walls() {
        let catalog = ModuleCatalog::standard();
        let room = ModuleTemplate::square("room", ModuleKind::FourExit, 1.0, &Direction::ALL);
        let mut world = World::new();
        let mut space = CollisionSpace::new();
        world.place_seed(&room, Vec2::ZERO, &mut space);

        // 2x2 room: four tiles, each with two interior and two exterior edges
        let report = fill_gaps(&mut world, &mut space, &catalog);
        assert_eq!(report.floor_tiles, 4);
        assert_eq!(report.walls_placed, 8);
        assert!(world.modules().all(|m| m.is_placed()));
    }

    #[test]
    fn test_fully_occupied_places_nothing() {
        let catalog = ModuleCatalog::standard();
        let mut world = World::new();
        world.spawn_floor_tile(Vec2::ZERO, None);
        let report = fill_gaps(&mut world, &mut AlwaysOccupied, &catalog);
        assert_eq!(report.walls_placed, 0);
        assert_eq!(world.counts().walls, 0);
        assert_eq!(world.len(), 1);
    }
}
