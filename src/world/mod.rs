//! Owned dungeon state: the live module set, the tag index, the connection
//! registry and the connection graph.
//!
//! Every pass takes the world by reference; nothing here is global.

pub mod layout;

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ModuleTemplate};
use crate::constants::FLOOR_TILE_SIZE;
use crate::generation::registry::ConnectionRegistry;
use crate::geometry::{Direction, Extents, Rotation};
use crate::module::{ConnectionFlags, Module, ModuleId, ModuleKind, PlacementState, Tag};
use crate::oracle::OccupancyOracle;

pub use layout::{DungeonLayout, LayoutConnection, LayoutModule};

/// Per-tag sets of module ids, kept in step with spawn/discard.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    by_tag: HashMap<Tag, BTreeSet<ModuleId>>,
}

impl TagIndex {
    fn insert(&mut self, tag: Tag, id: ModuleId) {
        self.by_tag.entry(tag).or_default().insert(id);
    }

    fn remove(&mut self, tag: Tag, id: ModuleId) {
        if let Some(set) = self.by_tag.get_mut(&tag) {
            set.remove(&id);
        }
    }

    /// Ids with `tag` in creation order
    pub fn ids(&self, tag: Tag) -> impl Iterator<Item = ModuleId> + '_ {
        self.by_tag.get(&tag).into_iter().flatten().copied()
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.by_tag.get(&tag).map_or(0, BTreeSet::len)
    }
}

/// Counts of placed modules per tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCounts {
    pub rooms: usize,
    pub halls: usize,
    pub caps: usize,
    pub walls: usize,
    pub floors: usize,
}

#[derive(Debug, Default)]
pub struct World {
    modules: Vec<Option<Module>>,
    tags: TagIndex,
    registry: ConnectionRegistry,
    graph: UnGraphMap<ModuleId, Direction>,
    seed: Option<ModuleId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate `template` as a pending module
    pub fn spawn(&mut self, template: &ModuleTemplate, category: Category) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        let tag = category.tag();
        self.modules.push(Some(Module {
            id,
            template: template.name.clone(),
            kind: template.kind,
            tag,
            flags: template.initial_flags(),
            connection_offset: template.connection_offset,
            width: template.width,
            height: template.height,
            position: Vec2::ZERO,
            rotation: Rotation::Deg0,
            state: PlacementState::Pending,
            has_floor: template.has_floor,
            parent: None,
        }));
        self.tags.insert(tag, id);
        id
    }

    /// Spawn `template` as the seed room and commit it at `position`
    pub fn place_seed<O: OccupancyOracle>(
        &mut self,
        template: &ModuleTemplate,
        position: Vec2,
        oracle: &mut O,
    ) -> ModuleId {
        let id = self.spawn(template, Category::Room);
        self.commit(id, position, Rotation::Deg0, oracle);
        self.graph.add_node(id);
        self.seed = Some(id);
        id
    }

    /// Move a pending module to its final position and report it to the oracle.
    /// Floor-carrying modules lay their floor tiles here.
    pub fn commit<O: OccupancyOracle>(
        &mut self,
        id: ModuleId,
        position: Vec2,
        rotation: Rotation,
        oracle: &mut O,
    ) {
        let Some(module) = self.get_mut(id) else {
            tracing::warn!(module = id.0, "commit on missing module");
            return;
        };
        module.position = position;
        module.rotation = rotation;
        module.state = PlacementState::Placed;
        let (tag, bounds, has_floor) = (module.tag, module.bounds(), module.has_floor);

        if tag.is_blocking() {
            oracle.insert(id, bounds);
        }
        if has_floor {
            self.lay_floor(id, bounds.min(), bounds.max());
        }
    }

    /// One floor tile per unit cell of the owner's footprint
    fn lay_floor(&mut self, owner: ModuleId, min: Vec2, max: Vec2) {
        let cols = ((max.x - min.x) / FLOOR_TILE_SIZE).round().max(1.0) as u32;
        let rows = ((max.y - min.y) / FLOOR_TILE_SIZE).round().max(1.0) as u32;
        for row in 0..rows {
            for col in 0..cols {
                let center = min
                    + Vec2::new(
                        (col as f32 + 0.5) * FLOOR_TILE_SIZE,
                        (row as f32 + 0.5) * FLOOR_TILE_SIZE,
                    );
                self.spawn_floor_tile(center, Some(owner));
            }
        }
    }

    /// Place a single floor tile. `owner` is `None` for free-standing tiles.
    pub fn spawn_floor_tile(&mut self, center: Vec2, owner: Option<ModuleId>) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        let size = Extents::new(FLOOR_TILE_SIZE, FLOOR_TILE_SIZE);
        self.modules.push(Some(Module {
            id,
            template: "floor".to_string(),
            kind: ModuleKind::Floor,
            tag: Tag::Floor,
            flags: ConnectionFlags::SEALED,
            connection_offset: FLOOR_TILE_SIZE * 0.5,
            width: size.width,
            height: size.height,
            position: center,
            rotation: Rotation::Deg0,
            state: PlacementState::Placed,
            has_floor: false,
            parent: owner,
        }));
        self.tags.insert(Tag::Floor, id);
        id
    }

    /// Mark a pending module as having failed its attempt
    pub fn reject(&mut self, id: ModuleId) {
        if let Some(module) = self.get_mut(id) {
            if module.state == PlacementState::Pending {
                module.state = PlacementState::Rejected;
            }
        }
    }

    /// Remove an unplaced module. Placed modules are permanent.
    pub fn discard(&mut self, id: ModuleId) -> bool {
        match self.get(id) {
            Some(module) if !module.is_placed() => {}
            _ => return false,
        }
        if let Some(module) = self.modules[id.index()].take() {
            self.tags.remove(module.tag, id);
        }
        true
    }

    /// Discard every module that never reached `Placed`
    pub fn collect_garbage(&mut self) -> usize {
        let litter: Vec<ModuleId> = self
            .modules()
            .filter(|m| !m.is_placed())
            .map(|m| m.id)
            .collect();
        litter.into_iter().filter(|id| self.discard(*id)).count()
    }

    /// Record a matched edge between two placed modules
    pub fn connect(&mut self, anchor: ModuleId, module: ModuleId, direction: Direction) {
        self.graph.add_edge(anchor, module, direction);
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// All live modules in creation order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().flatten()
    }

    pub fn placed(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.is_placed())
    }

    /// Ids carrying `tag`, in creation order
    pub fn tagged(&self, tag: Tag) -> impl Iterator<Item = ModuleId> + '_ {
        self.tags.ids(tag)
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    pub fn counts(&self) -> TagCounts {
        let placed = |tag| {
            self.tagged(tag)
                .filter(|id| self.get(*id).is_some_and(Module::is_placed))
                .count()
        };
        TagCounts {
            rooms: placed(Tag::Room),
            halls: placed(Tag::Hall),
            caps: placed(Tag::Cap),
            walls: placed(Tag::Wall),
            floors: placed(Tag::Floor),
        }
    }

    pub fn len(&self) -> usize {
        self.modules().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seed(&self) -> Option<ModuleId> {
        self.seed
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ConnectionRegistry {
        &mut self.registry
    }

    /// Modules sharing a matched edge with `id`
    pub fn neighbors(&self, id: ModuleId) -> Vec<ModuleId> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }
        self.graph.neighbors(id).collect()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn connections(&self) -> impl Iterator<Item = (ModuleId, ModuleId, Direction)> + '_ {
        self.graph.all_edges().map(|(a, b, dir)| (a, b, *dir))
    }

    /// Whether every placed room, hall and cap is reachable from the seed
    pub fn is_connected_to_seed(&self) -> bool {
        let Some(seed) = self.seed else {
            return self.is_empty();
        };
        let mut reached = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, seed);
        while let Some(id) = bfs.next(&self.graph) {
            reached.insert(id);
        }
        [Tag::Room, Tag::Hall, Tag::Cap]
            .into_iter()
            .flat_map(|tag| self.tagged(tag))
            .filter(|id| self.get(*id).is_some_and(Module::is_placed))
            .all(|id| reached.contains(&id))
    }
}
