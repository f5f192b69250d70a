//! Tower Dungeon - Procedural Layout Core
//!
//! Grows a 2D dungeon out of prefabricated modules:
//! - Module catalog (rooms, corridors, caps, walls) loaded from RON/JSON
//! - Connection registry: open joints on placed rooms and halls
//! - Greedy placement with an occupancy oracle
//! - Capping pass that seals leftover joints
//! - Wall-gap fill around every floor tile
//! - Layout export and parallel seed sweeps for tuning

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod generation;
pub mod geometry;
pub mod logging;
pub mod module;
pub mod oracle;
pub mod world;

pub use catalog::{Category, ModuleCatalog, ModuleTemplate};
pub use config::{ConfigError, GeneratorConfig, PointSelection};
pub use generation::{generate, GenerationReport, Generator};
pub use oracle::{CollisionSpace, OccupancyOracle};
pub use world::layout::DungeonLayout;
pub use world::World;
