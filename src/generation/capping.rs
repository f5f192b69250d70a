//! Capping pass: seal every connection point left open after growth.
//!
//! The registry is walked once as a snapshot; anchors' flags are re-read for
//! every cap attempt, so a point whose edge was closed earlier in the pass is
//! skipped. Each point is tested at its own coordinate for every cap template,
//! first fitting template wins.

use serde::{Deserialize, Serialize};

use super::flagging::flag;
use super::placement::matching_edge;
use super::registry::ConnectionPoint;
use crate::catalog::{Category, ModuleCatalog};
use crate::constants::{CAP_ROTATION_EAST, CAP_ROTATION_NORTH, CAP_ROTATION_SOUTH, CAP_ROTATION_WEST};
use crate::geometry::{Direction, Rotation};
use crate::module::ModuleId;
use crate::oracle::OccupancyOracle;
use crate::world::World;

/// Outcome of one capping pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapReport {
    pub points_visited: usize,
    pub caps_placed: usize,
    /// Points still open when the pass finished
    pub unresolved: Vec<ConnectionPoint>,
}

/// Rotation of a cap attached on `direction`; caps face back toward the anchor
pub fn cap_rotation(direction: Direction) -> Rotation {
    Rotation::from_degrees(match direction {
        Direction::North => CAP_ROTATION_NORTH,
        Direction::East => CAP_ROTATION_EAST,
        Direction::South => CAP_ROTATION_SOUTH,
        Direction::West => CAP_ROTATION_WEST,
    })
}

/// Try to seal `point` with the first cap template that fits
fn cap_point<O: OccupancyOracle>(
    world: &mut World,
    oracle: &mut O,
    catalog: &ModuleCatalog,
    point: &ConnectionPoint,
) -> Option<ModuleId> {
    let mut placed = None;
    for template in catalog.get(Category::Cap) {
        let cap = world.spawn(template, Category::Cap);

        if !oracle.is_occupied(point.position, template.extents()) {
            let target = world.get(point.anchor).and_then(|anchor| {
                matching_edge(anchor, point.position)
                    .map(|dir| (dir, anchor.attach_point(dir, template.connection_offset)))
            });
            if let Some((direction, position)) = target {
                world.commit(cap, position, cap_rotation(direction), oracle);
                flag(world, cap, direction, point.anchor);
                tracing::debug!(
                    template = template.name.as_str(),
                    module = cap.0,
                    anchor = point.anchor.0,
                    direction = direction.as_str(),
                    "cap placed"
                );
                placed = Some(cap);
            }
        }

        world.discard(cap);
    }
    placed
}

/// Seal the open connection points of the current registry
pub fn cap_all<O: OccupancyOracle>(
    world: &mut World,
    oracle: &mut O,
    catalog: &ModuleCatalog,
) -> CapReport {
    let points: Vec<ConnectionPoint> = world.registry().points().to_vec();
    let mut report = CapReport {
        points_visited: points.len(),
        ..Default::default()
    };

    for point in &points {
        if cap_point(world, oracle, catalog, point).is_some() {
            report.caps_placed += 1;
        }
    }

    // a point is unresolved if its anchor still has the matching edge open
    report.unresolved = points
        .into_iter()
        .filter(|p| {
            world
                .get(p.anchor)
                .is_some_and(|anchor| matching_edge(anchor, p.position).is_some())
        })
        .collect();

    tracing::info!(
        points = report.points_visited,
        caps = report.caps_placed,
        unresolved = report.unresolved.len(),
        "capping pass complete"
    );
    report
}
