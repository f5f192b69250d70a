use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dungeon_core::analysis::run_seed_sweep;
use dungeon_core::catalog::ModuleCatalog;
use dungeon_core::config::GeneratorConfig;
use dungeon_core::generation::rebuild;
use dungeon_core::generate;

fn config(iterations: u32) -> GeneratorConfig {
    GeneratorConfig {
        iterations,
        ..Default::default()
    }
    .without_pacing()
}

fn bench_generation(c: &mut Criterion) {
    let catalog = ModuleCatalog::standard();

    c.bench_function("generate_10_iterations", |b| {
        b.iter(|| generate(black_box(config(10)), catalog.clone()))
    });

    c.bench_function("generate_100_iterations", |b| {
        b.iter(|| generate(black_box(config(100)), catalog.clone()))
    });
}

fn bench_registry(c: &mut Criterion) {
    let (mut world, _) = generate(config(100), ModuleCatalog::standard()).expect("valid catalog");

    c.bench_function("registry_rebuild", |b| {
        b.iter(|| {
            rebuild(black_box(&mut world));
        })
    });

    c.bench_function("layout_export", |b| b.iter(|| black_box(&world).layout().to_json()));
}

fn bench_sweep(c: &mut Criterion) {
    let catalog = ModuleCatalog::standard();
    let config = config(20);

    c.bench_function("seed_sweep_32", |b| {
        b.iter(|| run_seed_sweep(black_box(&config), &catalog, 32))
    });
}

criterion_group!(benches, bench_generation, bench_registry, bench_sweep);
criterion_main!(benches);
