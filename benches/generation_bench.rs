use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use std::sync::Arc;

use terrain_core::config::GeneratorConfig;
use terrain_core::projection;
use terrain_core::rules::{RuleTable, Tileset};
use terrain_core::solver::WfcSolver;
use terrain_core::survey::{run_survey, SurveyConfig};
use terrain_core::world::{WorldGenerator, WorldRng};

fn bench_solver(c: &mut Criterion) {
    let tileset = Arc::new(Tileset::from_rules(&RuleTable::standard()).unwrap());
    let mut group = c.benchmark_group("wfc_solve");
    for size in [10usize, 25, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut solver = WfcSolver::new(
                    size,
                    size,
                    tileset.clone(),
                    WorldRng::seed_from_u64(black_box(42)),
                );
                solver.run(|_| {})
            })
        });
    }
    group.finish();

    c.bench_function("find_lowest_entropy_25", |b| {
        let solver = WfcSolver::new(25, 25, tileset.clone(), WorldRng::seed_from_u64(1));
        b.iter(|| black_box(solver.find_lowest_entropy()))
    });
}

fn bench_projection(c: &mut Criterion) {
    let tileset = Arc::new(Tileset::from_rules(&RuleTable::standard()).unwrap());
    let mut solver = WfcSolver::new(25, 25, tileset.clone(), WorldRng::seed_from_u64(7));
    solver.run(|_| {});

    c.bench_function("project_grid_25", |b| {
        b.iter(|| projection::project_grid(black_box(solver.grid()), &tileset))
    });

    let fine = projection::project_grid(solver.grid(), &tileset);
    c.bench_function("walkability_50", |b| b.iter(|| black_box(&fine).walkability()));
}

fn bench_world(c: &mut Criterion) {
    let mut generator = WorldGenerator::new(GeneratorConfig::default()).unwrap();
    c.bench_function("generate_default_world", |b| {
        b.iter(|| {
            generator.generate();
        })
    });

    let survey_generator = WorldGenerator::new(GeneratorConfig {
        world_width: 10,
        world_height: 10,
        ..Default::default()
    })
    .unwrap();
    c.bench_function("survey_100_small", |b| {
        b.iter(|| {
            run_survey(
                &survey_generator,
                &SurveyConfig {
                    build_count: 100,
                    base_seed: black_box(42),
                },
            )
        })
    });

    c.bench_function("rule_table_json_parse", |b| {
        let json = RuleTable::standard().to_json();
        b.iter(|| RuleTable::from_json_str(black_box(&json)))
    });
}

criterion_group!(benches, bench_solver, bench_projection, bench_world);
criterion_main!(benches);
