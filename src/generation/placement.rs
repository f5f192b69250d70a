//! Placement engine: one greedy growth attempt.
//!
//! An attempt picks an open connection point, instantiates a random template
//! from the requested category, asks the oracle whether the point is free and,
//! if the point still matches an open edge of its anchor, commits the module
//! flush against that edge. Failure is an outcome, not an error: the candidate
//! is marked rejected and the next registry rebuild collects it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::flagging::flag;
use super::registry::ConnectionPoint;
use crate::catalog::{Category, ModuleCatalog};
use crate::config::PointSelection;
use crate::constants::{GROWTH_ROTATION_HORIZONTAL, GROWTH_ROTATION_VERTICAL};
use crate::geometry::{same_point, Direction, Rotation};
use crate::module::{Module, ModuleId};
use crate::oracle::OccupancyOracle;
use crate::world::World;

/// Why an attempt placed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The registry had no open points
    NoOpenPoints,
    /// The catalog category was empty
    EmptyCategory,
    /// The oracle reported the connection point as blocked
    Occupied,
    /// The point no longer matches an open edge of its anchor
    NoMatchingEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementResult {
    Placed {
        module: ModuleId,
        anchor: ModuleId,
        direction: Direction,
    },
    Rejected(Rejection),
}

impl PlacementResult {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementResult::Placed { .. })
    }

    pub fn module(&self) -> Option<ModuleId> {
        match self {
            PlacementResult::Placed { module, .. } => Some(*module),
            PlacementResult::Rejected(_) => None,
        }
    }
}

/// Rotation of a growth placement attached on `direction`
pub fn growth_rotation(direction: Direction) -> Rotation {
    if direction.is_vertical() {
        Rotation::from_degrees(GROWTH_ROTATION_VERTICAL)
    } else {
        Rotation::from_degrees(GROWTH_ROTATION_HORIZONTAL)
    }
}

/// The open edge of `anchor` whose scan point is `point`, if any (N, E, S, W)
pub fn matching_edge(anchor: &Module, point: Vec2) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|dir| !anchor.flags.get(*dir) && same_point(anchor.scan_point(*dir), point))
}

/// Random registry point under `selection`
pub fn select_point<R: Rng + ?Sized>(
    world: &World,
    selection: PointSelection,
    rng: &mut R,
) -> Option<ConnectionPoint> {
    let registry = world.registry();
    let bound = selection.index_bound(registry.len());
    if bound == 0 {
        return None;
    }
    registry.get(rng.gen_range(0..bound)).copied()
}

/// Attempt one placement from `category`
pub fn try_place<O, R>(
    world: &mut World,
    oracle: &mut O,
    catalog: &ModuleCatalog,
    category: Category,
    selection: PointSelection,
    rng: &mut R,
) -> PlacementResult
where
    O: OccupancyOracle,
    R: Rng + ?Sized,
{
    let Some(point) = select_point(world, selection, rng) else {
        return PlacementResult::Rejected(Rejection::NoOpenPoints);
    };
    let Some(template) = catalog.pick(category, rng) else {
        return PlacementResult::Rejected(Rejection::EmptyCategory);
    };

    let candidate = world.spawn(template, category);
    if oracle.is_occupied(point.position, template.extents()) {
        world.reject(candidate);
        tracing::debug!(
            category = category.as_str(),
            template = template.name.as_str(),
            x = point.position.x,
            y = point.position.y,
            "placement rejected: occupied"
        );
        return PlacementResult::Rejected(Rejection::Occupied);
    }

    let target = world
        .get(point.anchor)
        .and_then(|anchor| {
            matching_edge(anchor, point.position)
                .map(|dir| (dir, anchor.attach_point(dir, template.connection_offset)))
        });
    let Some((direction, position)) = target else {
        world.reject(candidate);
        tracing::debug!(
            category = category.as_str(),
            anchor = point.anchor.0,
            "placement rejected: no matching open edge"
        );
        return PlacementResult::Rejected(Rejection::NoMatchingEdge);
    };

    world.commit(candidate, position, growth_rotation(direction), oracle);
    flag(world, candidate, direction, point.anchor);
    tracing::debug!(
        category = category.as_str(),
        template = template.name.as_str(),
        module = candidate.0,
        anchor = point.anchor.0,
        direction = direction.as_str(),
        x = position.x,
        y = position.y,
        "module placed"
    );

    PlacementResult::Placed {
        module: candidate,
        anchor: point.anchor,
        direction,
    }
}
