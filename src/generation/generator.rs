//! Generation driver: seed → growth → capping → wall fill as explicit steps.
//!
//! [`Generator::step`] advances one step and reports what it did; the generator
//! is also an [`Iterator`] over those reports. Pacing is the driver's business:
//! [`Generator::run_paced`] hands each delay to a caller-supplied sleep function.

use std::time::Duration;

use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::capping::{cap_all, CapReport};
use super::placement::{try_place, PlacementResult, Rejection};
use super::registry::rebuild;
use super::walls::{fill_gaps, WallReport};
use super::DungeonSeed;
use crate::catalog::{Category, ModuleCatalog};
use crate::config::{ConfigError, GeneratorConfig};
use crate::logging::TimingSpan;
use crate::module::ModuleId;
use crate::oracle::{CollisionSpace, OccupancyOracle};
use crate::world::{TagCounts, World};

/// Where the generator is in its fixed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Seed,
    Grow { iteration: u32 },
    Cap,
    FillWalls,
    Done,
}

/// What one step did
#[derive(Debug, Clone, PartialEq)]
pub enum StepReport {
    Seeded {
        module: ModuleId,
    },
    Grew {
        iteration: u32,
        room: PlacementResult,
        corridor: Option<PlacementResult>,
    },
    Capped(CapReport),
    WallsFilled(WallReport),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub no_open_points: usize,
    pub empty_category: usize,
    pub occupied: usize,
    pub no_matching_edge: usize,
}

impl RejectionCounts {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::NoOpenPoints => self.no_open_points += 1,
            Rejection::EmptyCategory => self.empty_category += 1,
            Rejection::Occupied => self.occupied += 1,
            Rejection::NoMatchingEdge => self.no_matching_edge += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_open_points + self.empty_category + self.occupied + self.no_matching_edge
    }
}

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub level: u32,
    pub room_attempts: usize,
    pub corridor_attempts: usize,
    pub placed: usize,
    pub rejections: RejectionCounts,
    pub caps_placed: usize,
    /// Connection points the capping pass could not seal
    pub open_points: usize,
    pub walls_placed: usize,
    pub counts: TagCounts,
    pub connected: bool,
}

impl GenerationReport {
    /// At least as many halls as rooms
    pub fn halls_saturated(&self) -> bool {
        self.counts.halls >= self.counts.rooms
    }

    pub fn fully_capped(&self) -> bool {
        self.open_points == 0
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn record(&mut self, result: &PlacementResult) {
        match result {
            PlacementResult::Placed { .. } => self.placed += 1,
            PlacementResult::Rejected(rejection) => self.rejections.record(*rejection),
        }
    }
}

pub struct Generator<O: OccupancyOracle = CollisionSpace> {
    config: GeneratorConfig,
    catalog: ModuleCatalog,
    world: World,
    oracle: O,
    rng: Xoshiro256PlusPlus,
    phase: Phase,
    report: GenerationReport,
}

impl Generator<CollisionSpace> {
    pub fn new(config: GeneratorConfig, catalog: ModuleCatalog) -> Result<Self, ConfigError> {
        Self::with_oracle(config, catalog, CollisionSpace::new())
    }
}

impl<O: OccupancyOracle> Generator<O> {
    pub fn with_oracle(
        config: GeneratorConfig,
        catalog: ModuleCatalog,
        oracle: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        catalog.validate()?;
        let rng = DungeonSeed { seed: config.seed }.rng(config.level);
        let report = GenerationReport {
            seed: config.seed,
            level: config.level,
            ..Default::default()
        };
        Ok(Self {
            config,
            catalog,
            world: World::new(),
            oracle,
            rng,
            phase: Phase::Seed,
            report,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Running report; final once the generator is done
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn into_parts(self) -> (World, O, GenerationReport) {
        (self.world, self.oracle, self.report)
    }

    /// Advance one step. `None` once the dungeon is finished.
    pub fn step(&mut self) -> Option<StepReport> {
        let step = match self.phase {
            Phase::Seed => self.seed_step(),
            Phase::Grow { iteration } => self.grow_step(iteration),
            Phase::Cap => self.cap_step(),
            Phase::FillWalls => self.wall_step(),
            Phase::Done => return None,
        };
        self.report.counts = self.world.counts();
        if self.phase == Phase::Done {
            self.report.connected = self.world.is_connected_to_seed();
        }
        step
    }

    /// Delay a paced driver should wait after `step`
    pub fn delay_after(&self, step: &StepReport) -> Duration {
        match step {
            StepReport::Grew { .. } => self.config.pacing_delay(),
            StepReport::Capped(_) => self.config.settle_delay(),
            _ => Duration::ZERO,
        }
    }

    /// Run to completion without pacing
    pub fn run(&mut self) -> &GenerationReport {
        while self.step().is_some() {}
        &self.report
    }

    /// Run to completion, passing every non-zero pacing delay to `sleep`
    pub fn run_paced(&mut self, mut sleep: impl FnMut(Duration)) -> &GenerationReport {
        while let Some(step) = self.step() {
            let delay = self.delay_after(&step);
            if !delay.is_zero() {
                sleep(delay);
            }
        }
        &self.report
    }

    fn after_seed_phase(&self) -> Phase {
        if self.config.iterations > 0 {
            Phase::Grow { iteration: 0 }
        } else {
            Phase::Cap
        }
    }

    fn seed_step(&mut self) -> Option<StepReport> {
        let Some(template) = self.catalog.pick(Category::Room, &mut self.rng) else {
            self.phase = Phase::Done;
            return None;
        };
        let module = self
            .world
            .place_seed(template, self.config.origin, &mut self.oracle);
        rebuild(&mut self.world);
        tracing::info!(
            seed = self.config.seed,
            level = self.config.level,
            template = template.name.as_str(),
            points = self.world.registry().len(),
            "seed room placed"
        );
        self.phase = self.after_seed_phase();
        Some(StepReport::Seeded { module })
    }

    fn attempt(&mut self, category: Category) -> PlacementResult {
        let result = try_place(
            &mut self.world,
            &mut self.oracle,
            &self.catalog,
            category,
            self.config.point_selection,
            &mut self.rng,
        );
        rebuild(&mut self.world);
        self.report.record(&result);
        result
    }

    fn grow_step(&mut self, iteration: u32) -> Option<StepReport> {
        let room = self.attempt(Category::Room);
        self.report.room_attempts += 1;

        let corridor = if self.config.corridor_due(iteration) {
            self.report.corridor_attempts += 1;
            Some(self.attempt(Category::Corridor))
        } else {
            None
        };

        tracing::debug!(
            iteration,
            room = room.is_placed(),
            corridor = corridor.map(|c| c.is_placed()),
            points = self.world.registry().len(),
            "growth iteration"
        );

        let next = iteration + 1;
        self.phase = if next < self.config.iterations {
            Phase::Grow { iteration: next }
        } else {
            Phase::Cap
        };
        Some(StepReport::Grew {
            iteration,
            room,
            corridor,
        })
    }

    fn cap_step(&mut self) -> Option<StepReport> {
        let _span = TimingSpan::new("cap_all");
        let report = cap_all(&mut self.world, &mut self.oracle, &self.catalog);
        rebuild(&mut self.world);
        self.report.caps_placed = report.caps_placed;
        self.report.open_points = report.unresolved.len();
        self.phase = Phase::FillWalls;
        Some(StepReport::Capped(report))
    }

    fn wall_step(&mut self) -> Option<StepReport> {
        let _span = TimingSpan::new("fill_gaps");
        let report = fill_gaps(&mut self.world, &mut self.oracle, &self.catalog);
        self.report.walls_placed = report.walls_placed;
        self.phase = Phase::Done;
        tracing::info!(
            placed = self.report.placed,
            rejected = self.report.rejections.total(),
            caps = self.report.caps_placed,
            walls = self.report.walls_placed,
            "dungeon generated"
        );
        Some(StepReport::WallsFilled(report))
    }
}

impl<O: OccupancyOracle> Iterator for Generator<O> {
    type Item = StepReport;

    fn next(&mut self) -> Option<StepReport> {
        self.step()
    }
}

/// Generate a complete dungeon with the in-crate collision space
pub fn generate(
    config: GeneratorConfig,
    catalog: ModuleCatalog,
) -> Result<(World, GenerationReport), ConfigError> {
    let mut generator = Generator::new(config, catalog)?;
    generator.run();
    let (world, _, report) = generator.into_parts();
    Ok((world, report))
}
