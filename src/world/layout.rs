//! Serializable snapshot of a finished dungeon.

use serde::{Deserialize, Serialize};

use super::World;
use crate::geometry::{Aabb, Direction, Rotation};
use crate::module::{ConnectionFlags, ModuleId, ModuleKind, Tag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutModule {
    pub id: ModuleId,
    pub template: String,
    pub kind: ModuleKind,
    pub tag: Tag,
    pub x: f32,
    pub y: f32,
    pub rotation: Rotation,
    pub flags: ConnectionFlags,
    pub bounds: Aabb,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<ModuleId>,
}

/// A matched edge: `module` hangs off `anchor`'s `direction` side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConnection {
    pub anchor: ModuleId,
    pub module: ModuleId,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub seed_module: Option<ModuleId>,
    pub modules: Vec<LayoutModule>,
    pub connections: Vec<LayoutConnection>,
}

impl DungeonLayout {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.modules.iter().filter(|m| m.tag == tag).count()
    }
}

impl World {
    /// Snapshot of every placed module and matched edge
    pub fn layout(&self) -> DungeonLayout {
        let modules = self
            .placed()
            .map(|m| LayoutModule {
                id: m.id,
                template: m.template.clone(),
                kind: m.kind,
                tag: m.tag,
                x: m.position.x,
                y: m.position.y,
                rotation: m.rotation,
                flags: m.flags,
                bounds: m.bounds(),
                parent: m.parent,
            })
            .collect();

        let mut connections: Vec<LayoutConnection> = self
            .connections()
            .map(|(a, b, direction)| {
                // graph edges are undirected; the lower id is always the anchor
                let (anchor, module) = if a < b { (a, b) } else { (b, a) };
                LayoutConnection {
                    anchor,
                    module,
                    direction,
                }
            })
            .collect();
        connections.sort_by_key(|c| (c.anchor, c.module));

        DungeonLayout {
            seed_module: self.seed(),
            modules,
            connections,
        }
    }
}
