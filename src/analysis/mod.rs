//! Seed sweeps: generate many dungeons in parallel and summarize them.
//!
//! Used to tune catalogs and iteration counts. Each run owns its world and
//! collision space; runs share only the read-only config and catalog.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::ModuleCatalog;
use crate::config::{ConfigError, GeneratorConfig};
use crate::generation::{generate, DungeonSeed, GenerationReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CountStats {
    pub avg: f32,
    pub min: usize,
    pub max: usize,
}

impl CountStats {
    fn from_counts(counts: &[usize]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }
        let sum: usize = counts.iter().sum();
        Self {
            avg: sum as f32 / counts.len() as f32,
            min: counts.iter().copied().min().unwrap_or(0),
            max: counts.iter().copied().max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub runs: usize,
    /// Growth placements per run (rooms + corridors beyond the seed)
    pub placed: CountStats,
    pub caps: CountStats,
    pub walls: CountStats,
    /// Share of runs whose capping pass sealed every point
    pub fully_capped_ratio: f32,
    /// Share of runs with at least as many halls as rooms
    pub hall_saturated_ratio: f32,
    /// Share of runs where every module is reachable from the seed
    pub connected_ratio: f32,
}

impl SweepReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Seeds for a sweep, derived from the base seed so sweeps are repeatable
pub fn sweep_seeds(base: u64, runs: usize) -> Vec<u64> {
    let root = DungeonSeed { seed: base };
    (0..runs as u32).map(|i| root.level_hash(i)).collect()
}

/// Generate `runs` dungeons from seeds derived from `config.seed`
pub fn run_seed_sweep(
    config: &GeneratorConfig,
    catalog: &ModuleCatalog,
    runs: usize,
) -> Result<SweepReport, ConfigError> {
    config.validate()?;
    catalog.validate()?;

    let reports: Vec<GenerationReport> = sweep_seeds(config.seed, runs)
        .into_par_iter()
        .map(|seed| {
            let run_config = GeneratorConfig {
                seed,
                ..config.clone()
            }
            .without_pacing();
            generate(run_config, catalog.clone()).map(|(_, report)| report)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let summary = summarize(&reports);
    tracing::info!(
        runs = summary.runs,
        avg_placed = summary.placed.avg,
        fully_capped = summary.fully_capped_ratio,
        "seed sweep complete"
    );
    Ok(summary)
}

pub fn summarize(reports: &[GenerationReport]) -> SweepReport {
    if reports.is_empty() {
        return SweepReport::default();
    }
    let n = reports.len() as f32;
    let collect = |f: fn(&GenerationReport) -> usize| -> Vec<usize> { reports.iter().map(f).collect() };
    let ratio = |f: fn(&GenerationReport) -> bool| reports.iter().filter(|r| f(r)).count() as f32 / n;

    SweepReport {
        runs: reports.len(),
        placed: CountStats::from_counts(&collect(|r| r.placed)),
        caps: CountStats::from_counts(&collect(|r| r.caps_placed)),
        walls: CountStats::from_counts(&collect(|r| r.walls_placed)),
        fully_capped_ratio: ratio(GenerationReport::fully_capped),
        hall_saturated_ratio: ratio(GenerationReport::halls_saturated),
        connected_ratio: ratio(|r| r.connected),
    }
}
