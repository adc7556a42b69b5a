//! World generation: owns the rule palette, runs builds and keeps the last
//! finished map for terrain queries.
//!
//! A build is a `MapBuild`, a steppable wrapper around the solver with its own
//! seeded RNG. `WorldGenerator` is the caller-facing entry point; it applies
//! the retry policy from `GeneratorConfig` and answers `terrain_at` style
//! queries against the last map whose build reached `Done`.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::sync::Arc;

use crate::config::{ConfigError, GeneratorConfig};
use crate::grid::{Cell, Grid, GridError, Position};
use crate::logging::TimingSpan;
use crate::projection::{self, FineGrid, TerrainLabel};
use crate::rules::{RuleError, RuleTable, TileId, Tileset};
use crate::solver::{BuildOutcome, SolverError, StepEvent, WfcSolver};
use crate::walkability::Walkability;

/// RNG used for every world build
pub type WorldRng = Xoshiro256PlusPlus;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("No map has been built yet")]
    NotBuilt,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Deterministic 64-bit seed from a base seed and a salt
pub fn derive_seed(seed: u64, salt: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(salt.to_le_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[0..8]);
    u64::from_le_bytes(bytes)
}

/// Seed for a retry attempt. Attempt 0 uses the base seed as-is.
pub fn derive_attempt_seed(seed: u64, attempt: u32) -> u64 {
    if attempt == 0 {
        seed
    } else {
        derive_seed(seed, u64::from(attempt))
    }
}

/// Centre of a `width` x `height` world grid, in grid units
pub fn reset_position_hint(width: usize, height: usize) -> (usize, usize) {
    (width / 2, height / 2)
}

/// `reset_position_hint` scaled to world units
pub fn reset_position_hint_scaled(width: usize, height: usize, scale: f32) -> (f32, f32) {
    let (x, y) = reset_position_hint(width, height);
    (x as f32 * scale, y as f32 * scale)
}

/// Run one build to `Done` and project it, contradicted or not.
///
/// `sink` receives every collapse. Callers that need to stop early should
/// drive a `MapBuild` instead and call `finish` on it.
pub fn build_map<R: Rng>(
    width: usize,
    height: usize,
    rules: &RuleTable,
    rng: R,
    sink: impl FnMut(&StepEvent),
) -> Result<(FineGrid, BuildOutcome), RuleError> {
    let tileset = Arc::new(Tileset::from_rules(rules)?);
    let mut solver = WfcSolver::new(width, height, tileset.clone(), rng);
    let outcome = solver.run(sink);
    Ok((projection::project_grid(solver.grid(), &tileset), outcome))
}

/// A build in progress
#[derive(Debug, Clone)]
pub struct MapBuild {
    solver: WfcSolver<WorldRng>,
    seed: u64,
    attempt: u32,
}

impl MapBuild {
    pub fn new(
        width: usize,
        height: usize,
        tileset: Arc<Tileset>,
        seed: u64,
        attempt: u32,
    ) -> Self {
        let rng = WorldRng::seed_from_u64(derive_attempt_seed(seed, attempt));
        tracing::debug!(
            target: "terrain_core::world",
            width,
            height,
            seed,
            attempt,
            "build started"
        );
        Self {
            solver: WfcSolver::new(width, height, tileset, rng),
            seed,
            attempt,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn solver(&self) -> &WfcSolver<WorldRng> {
        &self.solver
    }

    pub fn step(&mut self) -> Option<StepEvent> {
        self.solver.step()
    }

    pub fn is_done(&self) -> bool {
        self.solver.is_done()
    }

    pub fn outcome(&self) -> Option<BuildOutcome> {
        self.solver.outcome()
    }

    pub fn steps(&self) -> usize {
        self.solver.steps()
    }

    pub fn pin(&mut self, pos: Position, tile: TileId) -> Result<StepEvent, WorldError> {
        Ok(self.solver.pin(pos, tile)?)
    }

    pub fn pin_named(&mut self, pos: Position, name: &str) -> Result<StepEvent, WorldError> {
        Ok(self.solver.pin_named(pos, name)?)
    }

    pub fn run(&mut self, sink: impl FnMut(&StepEvent)) -> BuildOutcome {
        self.solver.run(sink)
    }

    /// Project whatever is collapsed so far. An unfinished build yields a
    /// partial map with `outcome == None`.
    pub fn finish(self) -> WorldMap {
        let outcome = self.solver.outcome();
        let steps = self.solver.steps();
        let tileset = self.solver.tileset().clone();
        let coarse = self.solver.into_grid();
        let fine = projection::project_grid(&coarse, &tileset);
        WorldMap {
            seed: self.seed,
            attempt: self.attempt,
            outcome,
            steps,
            coarse,
            fine,
            tileset,
        }
    }
}

impl Iterator for MapBuild {
    type Item = StepEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

/// Result of one build: the coarse tile grid and its fine projection
#[derive(Debug, Clone)]
pub struct WorldMap {
    seed: u64,
    attempt: u32,
    outcome: Option<BuildOutcome>,
    steps: usize,
    coarse: Grid<Cell>,
    fine: FineGrid,
    tileset: Arc<Tileset>,
}

impl WorldMap {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// `None` if the build was stopped before `Done`
    pub fn outcome(&self) -> Option<BuildOutcome> {
        self.outcome
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_some_and(|o| o.is_completed())
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn coarse(&self) -> &Grid<Cell> {
        &self.coarse
    }

    pub fn fine(&self) -> &FineGrid {
        &self.fine
    }

    pub fn terrain_at(&self, x: usize, y: usize) -> Result<TerrainLabel, GridError> {
        self.fine.terrain_at(x, y)
    }

    pub fn walkability_at(&self, x: usize, y: usize) -> Result<Walkability, GridError> {
        self.fine.walkability_at(x, y)
    }

    /// Name of the tile collapsed at world position (x, y), if any
    pub fn tile_at(&self, x: usize, y: usize) -> Result<Option<&str>, GridError> {
        let cell = self.coarse.cell_at(Position::new(x, y))?;
        Ok(cell.resolved().and_then(|tile| self.tileset.name(tile)))
    }

    pub fn summary(&self) -> MapSummary {
        let walkable_cells = self
            .fine
            .walkability()
            .cells()
            .iter()
            .filter(|w| w.is_walkable())
            .count();
        MapSummary {
            seed: self.seed,
            attempt: self.attempt,
            outcome: self.outcome,
            steps: self.steps,
            world_width: self.coarse.width(),
            world_height: self.coarse.height(),
            game_width: self.fine.width(),
            game_height: self.fine.height(),
            walkable_cells,
            label_counts: self.fine.label_counts(),
            rows: self.fine.to_string().lines().map(str::to_string).collect(),
        }
    }
}

/// Serializable digest of a `WorldMap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSummary {
    pub seed: u64,
    pub attempt: u32,
    pub outcome: Option<BuildOutcome>,
    pub steps: usize,
    pub world_width: usize,
    pub world_height: usize,
    pub game_width: usize,
    pub game_height: usize,
    pub walkable_cells: usize,
    /// Fine cells per terrain label, `None` for cells without terrain
    pub label_counts: Vec<(TerrainLabel, usize)>,
    /// Fine grid rows, top row first
    pub rows: Vec<String>,
}

impl MapSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Entry point for building terrain from a `GeneratorConfig`
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: GeneratorConfig,
    tileset: Arc<Tileset>,
    last: Option<WorldMap>,
}

impl WorldGenerator {
    /// Resolve the configured rule table and palette
    pub fn new(config: GeneratorConfig) -> Result<Self, WorldError> {
        let table = match &config.rules_path {
            Some(path) => RuleTable::load(path)?,
            None => RuleTable::standard(),
        };
        Self::with_rules(config, &table)
    }

    pub fn with_rules(config: GeneratorConfig, table: &RuleTable) -> Result<Self, WorldError> {
        config.validate()?;
        let tileset = match &config.tiles {
            Some(names) => Tileset::with_names(names.iter().cloned(), table)?,
            None => Tileset::from_rules(table)?,
        };
        tracing::debug!(
            target: "terrain_core::world",
            tiles = tileset.len(),
            width = config.world_width,
            height = config.world_height,
            "world generator ready"
        );
        Ok(Self {
            config,
            tileset: Arc::new(tileset),
            last: None,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    /// Fresh build with a re-initialized grid
    pub fn begin(&self, seed: u64) -> MapBuild {
        self.begin_attempt(seed, 0)
    }

    pub fn begin_attempt(&self, seed: u64, attempt: u32) -> MapBuild {
        MapBuild::new(
            self.config.world_width,
            self.config.world_height,
            self.tileset.clone(),
            seed,
            attempt,
        )
    }

    /// Keep `map` for queries if its build reached `Done`
    pub fn store(&mut self, map: WorldMap) -> bool {
        if map.is_aborted() {
            tracing::debug!(
                target: "terrain_core::world",
                steps = map.steps(),
                "aborted build not stored"
            );
            return false;
        }
        self.last = Some(map);
        true
    }

    /// Single attempt with `seed`, run to `Done` and stored
    pub fn build_map(&mut self, seed: u64, sink: impl FnMut(&StepEvent)) -> &WorldMap {
        let _span = TimingSpan::new("build_map");
        let mut build = self.begin(seed);
        build.run(sink);
        self.last.insert(build.finish())
    }

    /// Build with the configured seed and retry budget
    pub fn generate(&mut self) -> &WorldMap {
        self.generate_with_seed(self.config.seed)
    }

    /// Up to `max_attempts` builds, stopping at the first completed one. When
    /// every attempt contradicts, the last one is kept.
    pub fn generate_with_seed(&mut self, seed: u64) -> &WorldMap {
        let _span = TimingSpan::new("generate");
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let mut build = self.begin_attempt(seed, attempt);
            build.run(|_| {});
            let map = build.finish();
            if map.is_completed() || attempt + 1 >= attempts {
                tracing::info!(
                    target: "terrain_core::world",
                    seed,
                    attempt,
                    outcome = map.outcome().map(|o| o.as_str()).unwrap_or("aborted"),
                    "generation finished"
                );
                return self.last.insert(map);
            }
            tracing::info!(
                target: "terrain_core::world",
                seed,
                attempt,
                "contradiction, retrying"
            );
            attempt += 1;
        }
    }

    pub fn last_map(&self) -> Option<&WorldMap> {
        self.last.as_ref()
    }

    fn map(&self) -> Result<&WorldMap, WorldError> {
        self.last.as_ref().ok_or(WorldError::NotBuilt)
    }

    pub fn terrain_at(&self, x: usize, y: usize) -> Result<TerrainLabel, WorldError> {
        Ok(self.map()?.terrain_at(x, y)?)
    }

    pub fn walkability_at(&self, x: usize, y: usize) -> Result<Walkability, WorldError> {
        Ok(self.map()?.walkability_at(x, y)?)
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Result<Option<&str>, WorldError> {
        Ok(self.map()?.tile_at(x, y)?)
    }

    /// Camera origin for the configured world, in world units
    pub fn reset_position(&self) -> (f32, f32) {
        reset_position_hint_scaled(
            self.config.world_width,
            self.config.world_height,
            self.config.grid_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{TileEntry, TileRule};

    fn small_config(width: usize, height: usize) -> GeneratorConfig {
        GeneratorConfig {
            world_width: width,
            world_height: height,
            ..Default::default()
        }
    }

    fn uniform_rules() -> RuleTable {
        RuleTable::from_entries([
            TileEntry::new("grass", TileRule::parse("GG", "GG", "GG", "GG").unwrap()),
            TileEntry::new("sand", TileRule::parse("SS", "GG", "SS", "GG").unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn test_attempt_seed_derivation() {
        assert_eq!(derive_attempt_seed(42, 0), 42);
        assert_eq!(derive_attempt_seed(42, 1), derive_attempt_seed(42, 1));
        assert_ne!(derive_attempt_seed(42, 1), derive_attempt_seed(42, 2));
        assert_ne!(derive_attempt_seed(42, 1), derive_attempt_seed(43, 1));
    }

    #[test]
    fn test_reset_position_hint() {
        assert_eq!(reset_position_hint(25, 25), (12, 12));
        assert_eq!(reset_position_hint(10, 4), (5, 2));
        assert_eq!(reset_position_hint_scaled(25, 25, 2.0), (24.0, 24.0));
    }

    #[test]
    fn test_terrain_at_before_build() {
        let generator = WorldGenerator::new(small_config(3, 3)).unwrap();
        assert!(matches!(generator.terrain_at(0, 0), Err(WorldError::NotBuilt)));
        assert!(matches!(generator.tile_at(0, 0), Err(WorldError::NotBuilt)));
        assert!(generator.last_map().is_none());
    }

    #[test]
    fn test_build_map_stores_result() {
        let mut generator =
            WorldGenerator::with_rules(small_config(4, 3), &uniform_rules()).unwrap();
        let mut events = 0;
        let map = generator.build_map(7, |_| events += 1);
        assert!(map.is_completed());
        assert_eq!(map.steps(), 12);
        assert_eq!(events, 12);
        assert_eq!(map.fine().width(), 8);
        assert_eq!(map.fine().height(), 6);

        let label = generator.terrain_at(7, 5).unwrap();
        assert!(label == TerrainLabel::new('G') || label == TerrainLabel::new('S'));
        assert!(generator.walkability_at(0, 0).unwrap().is_walkable());
        assert!(generator.tile_at(3, 2).unwrap().is_some());
        assert!(matches!(
            generator.terrain_at(8, 0),
            Err(WorldError::Grid(GridError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_aborted_build_not_stored() {
        let mut generator = WorldGenerator::new(small_config(5, 5)).unwrap();
        let mut build = generator.begin(1);
        build.step();
        build.step();
        let partial = build.finish();
        assert!(partial.is_aborted());
        assert_eq!(partial.steps(), 2);
        assert!(!generator.store(partial));
        assert!(matches!(generator.terrain_at(0, 0), Err(WorldError::NotBuilt)));
    }

    #[test]
    fn test_same_seed_same_map() {
        let mut a = WorldGenerator::new(small_config(8, 8)).unwrap();
        let mut b = WorldGenerator::new(small_config(8, 8)).unwrap();
        let map_a = a.build_map(99, |_| {}).fine().clone();
        let map_b = b.build_map(99, |_| {}).fine().clone();
        assert_eq!(map_a, map_b);
    }

    #[test]
    fn test_generate_retries_until_budget() {
        // Every build of two cells contradicts after one collapse
        let rules = RuleTable::from_entries([
            TileEntry::new("a", TileRule::parse("GG", "GG", "GG", "SS").unwrap()),
            TileEntry::new("b", TileRule::parse("GG", "WW", "GG", "BB").unwrap()),
        ])
        .unwrap();
        let config = GeneratorConfig {
            max_attempts: 3,
            ..small_config(2, 1)
        };
        let mut generator = WorldGenerator::with_rules(config, &rules).unwrap();
        let map = generator.generate();
        assert_eq!(map.attempt(), 2);
        assert_eq!(
            map.outcome(),
            Some(BuildOutcome::ContradictionReached { unresolved: 1 })
        );
        // the contradicted map is still queryable
        assert!(generator.terrain_at(0, 0).is_ok());
    }

    #[test]
    fn test_generate_stops_at_first_completion() {
        let config = GeneratorConfig {
            max_attempts: 5,
            ..small_config(3, 3)
        };
        let mut generator = WorldGenerator::with_rules(config, &uniform_rules()).unwrap();
        let map = generator.generate();
        assert!(map.is_completed());
        assert_eq!(map.attempt(), 0);
    }

    #[test]
    fn test_palette_with_unknown_tile() {
        let config = GeneratorConfig {
            tiles: Some(vec!["grass".into(), "ghost".into()]),
            ..small_config(2, 2)
        };
        let generator = WorldGenerator::with_rules(config, &uniform_rules()).unwrap();
        assert_eq!(generator.tileset().len(), 2);
        assert!(generator
            .tileset()
            .rule(generator.tileset().id_of("ghost").unwrap())
            .is_none());
    }

    #[test]
    fn test_free_build_map() {
        let (fine, outcome) = build_map(
            2,
            2,
            &uniform_rules(),
            WorldRng::seed_from_u64(3),
            |_| {},
        )
        .unwrap();
        assert_eq!(outcome, BuildOutcome::Completed);
        assert_eq!((fine.width(), fine.height()), (4, 4));
        assert!(fine.labels().cells().iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_free_build_map_reports_contradiction() {
        let rules = RuleTable::from_entries([
            TileEntry::new("a", TileRule::parse("GG", "GG", "GG", "SS").unwrap()),
            TileEntry::new("b", TileRule::parse("GG", "WW", "GG", "BB").unwrap()),
        ])
        .unwrap();
        let mut events = 0;
        let (fine, outcome) =
            build_map(2, 1, &rules, WorldRng::seed_from_u64(5), |_| events += 1).unwrap();
        assert_eq!(outcome, BuildOutcome::ContradictionReached { unresolved: 1 });
        assert_eq!(events, 1);
        // the stuck cell projects to empty terrain
        let empty = fine.labels().cells().iter().filter(|l| l.is_empty()).count();
        assert_eq!(empty, 4);
    }

    #[test]
    fn test_summary_counts_empty_apart_from_terrain() {
        let rules = RuleTable::from_entries([
            TileEntry::new("grass", TileRule::parse("GG", "GG", "GG", "GG").unwrap()),
        ])
        .unwrap();
        let config = GeneratorConfig {
            tiles: Some(vec!["grass".into(), "ghost".into()]),
            ..small_config(1, 2)
        };
        let generator = WorldGenerator::with_rules(config, &rules).unwrap();
        let mut build = generator.begin(0);
        build.pin_named(Position::new(0, 0), "ghost").unwrap();
        build.pin_named(Position::new(0, 1), "grass").unwrap();
        let summary = build.finish().summary();
        assert_eq!(
            summary.label_counts,
            vec![(TerrainLabel::EMPTY, 4), (TerrainLabel::new('G'), 4)]
        );
    }

    #[test]
    fn test_summary_json() {
        let mut generator =
            WorldGenerator::with_rules(small_config(2, 2), &uniform_rules()).unwrap();
        let summary = generator.build_map(5, |_| {}).summary();
        assert_eq!(summary.rows.len(), 4);
        assert_eq!(summary.walkable_cells, 16);
        let json = summary.to_json();
        let restored: MapSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, summary);
    }
}
