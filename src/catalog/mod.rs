//! Module catalog: the instantiable module definitions, grouped by category.
//!
//! A catalog can be built in code ([`ModuleCatalog::standard`]) or loaded from a
//! RON/JSON document. Every category must hold at least one template.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{load_document, ConfigError};
use crate::geometry::{Direction, Extents};
use crate::module::{ConnectionFlags, ModuleKind, Tag};

/// Catalog category a placement draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Room,
    Corridor,
    Cap,
    Wall,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Room,
        Category::Corridor,
        Category::Cap,
        Category::Wall,
    ];

    /// Classification given to modules instantiated from this category
    pub fn tag(&self) -> Tag {
        match self {
            Category::Room => Tag::Room,
            Category::Corridor => Tag::Hall,
            Category::Cap => Tag::Cap,
            Category::Wall => Tag::Wall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Room => "room",
            Category::Corridor => "corridor",
            Category::Cap => "cap",
            Category::Wall => "wall",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition a module is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTemplate {
    pub name: String,
    pub kind: ModuleKind,
    /// Open edges; every other edge starts closed
    #[serde(default)]
    pub exits: Vec<Direction>,
    pub connection_offset: f32,
    pub width: f32,
    pub height: f32,
    /// Whether placing this module lays floor tiles over its footprint
    #[serde(default)]
    pub has_floor: bool,
}

impl ModuleTemplate {
    /// Square template whose side is twice its connection offset
    pub fn square(name: &str, kind: ModuleKind, offset: f32, exits: &[Direction]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            exits: exits.to_vec(),
            connection_offset: offset,
            width: offset * 2.0,
            height: offset * 2.0,
            has_floor: true,
        }
    }

    pub fn without_floor(mut self) -> Self {
        self.has_floor = false;
        self
    }

    pub fn initial_flags(&self) -> ConnectionFlags {
        ConnectionFlags::with_exits(&self.exits)
    }

    pub fn extents(&self) -> Extents {
        Extents::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTemplate {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !(self.connection_offset.is_finite() && self.connection_offset > 0.0) {
            return Err(invalid("connection_offset must be positive"));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(invalid("width must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(invalid("height must be positive"));
        }
        Ok(())
    }
}

/// The four template lists consumed by the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleCatalog {
    #[serde(default)]
    pub rooms: Vec<ModuleTemplate>,
    #[serde(default)]
    pub corridors: Vec<ModuleTemplate>,
    #[serde(default)]
    pub caps: Vec<ModuleTemplate>,
    #[serde(default)]
    pub walls: Vec<ModuleTemplate>,
}

impl ModuleCatalog {
    /// Built-in catalog: 4x4 modules joined on a 2-unit connection offset,
    /// 1x1 wall filler.
    pub fn standard() -> Self {
        use Direction::*;
        Self {
            rooms: vec![
                ModuleTemplate::square("four_exit", ModuleKind::FourExit, 2.0, &[North, East, South, West]),
                ModuleTemplate::square("three_exit", ModuleKind::ThreeExit, 2.0, &[North, East, West]),
                ModuleTemplate::square("two_exit_straight", ModuleKind::TwoExit, 2.0, &[North, South]),
                ModuleTemplate::square("two_exit_cross", ModuleKind::TwoExit, 2.0, &[East, West]),
                ModuleTemplate::square("two_exit_corner", ModuleKind::TwoExit, 2.0, &[North, East]),
            ],
            corridors: vec![ModuleTemplate::square(
                "corridor",
                ModuleKind::Corridor,
                2.0,
                &[North, East, South, West],
            )],
            caps: vec![ModuleTemplate::square("cap", ModuleKind::Cap, 2.0, &[])],
            walls: vec![ModuleTemplate::square("wall", ModuleKind::Wall, 0.5, &[]).without_floor()],
        }
    }

    pub fn get(&self, category: Category) -> &[ModuleTemplate] {
        match category {
            Category::Room => &self.rooms,
            Category::Corridor => &self.corridors,
            Category::Cap => &self.caps,
            Category::Wall => &self.walls,
        }
    }

    /// Uniformly random template from `category`
    pub fn pick<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Option<&ModuleTemplate> {
        self.get(category).choose(rng)
    }

    /// The wall filler used by the gap pass (first wall template)
    pub fn wall(&self) -> Option<&ModuleTemplate> {
        self.walls.first()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let templates = self.get(category);
            if templates.is_empty() {
                return Err(ConfigError::EmptyCategory(category));
            }
            for template in templates {
                template.validate()?;
            }
        }
        Ok(())
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let catalog: Self = ron::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a `.ron` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let catalog: Self = load_document(path.as_ref())?;
        catalog.validate()?;
        Ok(catalog)
    }
}
