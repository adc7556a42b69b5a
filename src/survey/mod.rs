//! Batch survey of many independent builds.
//!
//! Each build runs its own single-threaded solver; builds are spread across
//! cores with rayon. Used to measure how often a rule table contradicts and
//! what terrain mix it produces.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::projection::TerrainLabel;
use crate::solver::BuildOutcome;
use crate::world::{derive_seed, WorldGenerator};

/// Configuration for a survey run
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub build_count: u64,
    pub base_seed: u64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            build_count: 100,
            base_seed: 42,
        }
    }
}

/// Aggregate statistics over a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub total_builds: u64,
    pub completed: u64,
    pub contradictions: u64,
    pub contradiction_rate: f32,
    pub avg_steps: f32,
    /// Share of walkable fine cells over every build
    pub walkable_fraction: f32,
    /// Fine-cell count per terrain label, empty cells under `None`
    pub label_histogram: Vec<(TerrainLabel, u64)>,
}

/// What one build contributes to the report
#[derive(Debug, Clone)]
struct BuildSample {
    outcome: Option<BuildOutcome>,
    steps: usize,
    fine_cells: usize,
    walkable: usize,
    labels: Vec<(TerrainLabel, usize)>,
}

fn sample_build(generator: &WorldGenerator, seed: u64) -> BuildSample {
    let mut build = generator.begin(seed);
    build.run(|_| {});
    let map = build.finish();
    let walkability = map.fine().walkability();
    BuildSample {
        outcome: map.outcome(),
        steps: map.steps(),
        fine_cells: walkability.len(),
        walkable: walkability.cells().iter().filter(|w| w.is_walkable()).count(),
        labels: map.fine().label_counts(),
    }
}

/// Run `config.build_count` builds in parallel with `generator`'s palette
pub fn run_survey(generator: &WorldGenerator, config: &SurveyConfig) -> SurveyReport {
    let seeds: Vec<u64> = (0..config.build_count)
        .map(|i| derive_seed(config.base_seed, i))
        .collect();

    let samples: Vec<BuildSample> = seeds
        .par_iter()
        .map(|seed| sample_build(generator, *seed))
        .collect();

    let report = analyze_samples(&samples);
    tracing::info!(
        target: "terrain_core::survey",
        builds = report.total_builds,
        contradiction_rate = report.contradiction_rate,
        "survey finished"
    );
    report
}

fn analyze_samples(samples: &[BuildSample]) -> SurveyReport {
    if samples.is_empty() {
        return SurveyReport {
            total_builds: 0,
            completed: 0,
            contradictions: 0,
            contradiction_rate: 0.0,
            avg_steps: 0.0,
            walkable_fraction: 0.0,
            label_histogram: vec![],
        };
    }

    let total = samples.len() as u64;
    let completed = samples
        .iter()
        .filter(|s| s.outcome.is_some_and(|o| o.is_completed()))
        .count() as u64;
    let contradictions = samples
        .iter()
        .filter(|s| matches!(s.outcome, Some(BuildOutcome::ContradictionReached { .. })))
        .count() as u64;
    let steps: usize = samples.iter().map(|s| s.steps).sum();
    let fine_cells: usize = samples.iter().map(|s| s.fine_cells).sum();
    let walkable: usize = samples.iter().map(|s| s.walkable).sum();

    let mut histogram: Vec<(TerrainLabel, u64)> = Vec::new();
    for (label, count) in samples.iter().flat_map(|s| s.labels.iter()) {
        match histogram.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += *count as u64,
            None => histogram.push((*label, *count as u64)),
        }
    }
    histogram.sort_by_key(|(label, _)| label.letter());

    SurveyReport {
        total_builds: total,
        completed,
        contradictions,
        contradiction_rate: contradictions as f32 / total as f32,
        avg_steps: steps as f32 / total as f32,
        walkable_fraction: if fine_cells == 0 {
            0.0
        } else {
            walkable as f32 / fine_cells as f32
        },
        label_histogram: histogram,
    }
}
