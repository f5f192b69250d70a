//! Generator configuration and document loading.
//!
//! Configuration files are RON (`.ron`) or JSON (`.json`). Missing fields fall
//! back to [`GeneratorConfig::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Category;
use crate::constants::{
    DEFAULT_CORRIDOR_INTERVAL, DEFAULT_ITERATIONS, DEFAULT_PACING_DELAY_MS,
    DEFAULT_SETTLE_DELAY_MS,
};

/// Errors raised while loading configuration or catalogs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format for {0} (expected .ron or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("catalog category `{0}` has no templates")]
    EmptyCategory(Category),
    #[error("template `{name}` is invalid: {reason}")]
    InvalidTemplate { name: String, reason: String },
    #[error("corridor_interval must be at least 1")]
    ZeroCorridorInterval,
}

/// How the growth step picks a connection point from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointSelection {
    /// Every registered point is equally likely
    #[default]
    Uniform,
    /// Never picks the last registered point unless it is the only one
    ExcludeLast,
}

impl PointSelection {
    /// Exclusive upper bound of the index range for `len` points
    pub fn index_bound(&self, len: usize) -> usize {
        match self {
            PointSelection::Uniform => len,
            PointSelection::ExcludeLast => match len {
                0 | 1 => len,
                n => n - 1,
            },
        }
    }
}

/// Tunables for one dungeon generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Mixed with `seed` so several levels can share one base seed
    pub level: u32,
    /// Number of room placement attempts
    pub iterations: u32,
    /// A corridor attempt follows every `corridor_interval`-th room attempt
    pub corridor_interval: u32,
    pub pacing_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub point_selection: PointSelection,
    /// Where the seed room is placed
    pub origin: Vec2,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            level: 1,
            iterations: DEFAULT_ITERATIONS,
            corridor_interval: DEFAULT_CORRIDOR_INTERVAL,
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            point_selection: PointSelection::Uniform,
            origin: Vec2::ZERO,
        }
    }
}

impl GeneratorConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Whether growth iteration `iteration` (zero-based) also attempts a corridor
    pub fn corridor_due(&self, iteration: u32) -> bool {
        self.corridor_interval > 0 && (iteration + 1) % self.corridor_interval == 0
    }

    /// Drop interactive pacing (batch runs, tests)
    pub fn without_pacing(mut self) -> Self {
        self.pacing_delay_ms = 0;
        self.settle_delay_ms = 0;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corridor_interval == 0 {
            return Err(ConfigError::ZeroCorridorInterval);
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_document(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Read a RON or JSON document, choosing the parser from the file extension
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(ron::from_str(&text)?),
        Some("json") => Ok(serde_json::from_str(&text)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.iterations, 10);
        assert_eq!(config.corridor_interval, 3);
        assert_eq!(config.point_selection, PointSelection::Uniform);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_corridor_cadence() {
        let config = GeneratorConfig::default();
        let due: Vec<u32> = (0..10).filter(|i| config.corridor_due(*i)).collect();
        assert_eq!(due, vec![2, 5, 8]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = GeneratorConfig {
            corridor_interval: 0,
            ..Default::default()
        };
        assert!(!config.corridor_due(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCorridorInterval)
        ));
    }

    #[test]
    fn test_point_selection_bounds() {
        assert_eq!(PointSelection::Uniform.index_bound(5), 5);
        assert_eq!(PointSelection::ExcludeLast.index_bound(5), 4);
        assert_eq!(PointSelection::ExcludeLast.index_bound(1), 1);
        assert_eq!(PointSelection::ExcludeLast.index_bound(0), 0);
        assert_eq!(PointSelection::Uniform.index_bound(0), 0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GeneratorConfig = ron::from_str("(seed: 7, iterations: 25)").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.iterations, 25);
        assert_eq!(config.corridor_interval, 3);
    }

    #[test]
    fn test_without_pacing() {
        let config = GeneratorConfig {
            pacing_delay_ms: 250,
            ..Default::default()
        }
        .without_pacing();
        assert_eq!(config.pacing_delay(), Duration::ZERO);
        assert_eq!(config.settle_delay(), Duration::ZERO);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GeneratorConfig {
            seed: 99,
            point_selection: PointSelection::ExcludeLast,
            ..Default::default()
        };
        let restored: GeneratorConfig = serde_json::from_str(&config.to_json()).unwrap();
        assert_eq!(restored, config);
    }
}
