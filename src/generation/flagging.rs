//! Mutual connection flagging between a freshly placed module and its anchor.

use crate::geometry::Direction;
use crate::module::{ModuleId, ModuleKind};
use crate::world::World;

/// Close `anchor`'s `direction` edge and the candidate's opposite edge.
///
/// A corridor is a straight passage: its perpendicular edges are closed as well
/// and the same pair is mirrored onto the anchor.
pub fn flag(world: &mut World, candidate: ModuleId, direction: Direction, anchor: ModuleId) {
    let is_corridor = world
        .get(candidate)
        .is_some_and(|m| m.kind == ModuleKind::Corridor);
    let side = direction.perpendicular();

    if let Some(module) = world.get_mut(candidate) {
        module.flags.set(direction.opposite(), true);
        if is_corridor {
            for dir in side {
                module.flags.set(dir, true);
            }
        }
    }
    if let Some(module) = world.get_mut(anchor) {
        module.flags.set(direction, true);
        if is_corridor {
            for dir in side {
                module.flags.set(dir, true);
            }
        }
    }

    world.connect(anchor, candidate, direction);
    tracing::trace!(
        anchor = anchor.0,
        module = candidate.0,
        direction = direction.as_str(),
        corridor = is_corridor,
        "connection flagged"
    );
}
