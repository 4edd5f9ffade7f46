//! Benchmarks for footprint transformation and resampling.
//!
//! Run with: cargo bench --package grid-processor --bench resample_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_processor::{compute_footprint, resample};
use projection::CrsRegistry;
use test_utils::{bbox, elevation_raster};
use tiler_common::CrsId;

// =============================================================================
// RESAMPLE BENCHMARKS
// =============================================================================

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    group.sample_size(20);

    let registry = CrsRegistry::with_epsg_database();
    let scenarios = [
        // (target CRS, size, name)
        (CrsId::wgs84(), 256, "identity_256"),
        (CrsId::epsg(32633), 256, "utm33_256"),
        (CrsId::epsg(32633), 1024, "utm33_1024"),
    ];

    for (target, size, name) in scenarios {
        let raster = elevation_raster(size, size, bbox::alps_wgs84());
        let transform = registry
            .transformer(&CrsId::wgs84(), &target)
            .expect("transformer");
        let footprint = compute_footprint(&raster, &transform).expect("footprint");

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new(name, "bilinear"), &raster, |b, raster| {
            b.iter(|| resample(black_box(raster), &footprint, &transform));
        });
    }

    group.finish();
}

// =============================================================================
// FOOTPRINT BENCHMARKS
// =============================================================================

fn bench_footprint(c: &mut Criterion) {
    let registry = CrsRegistry::with_epsg_database();
    let transform = registry
        .transformer(&CrsId::wgs84(), &CrsId::epsg(32633))
        .expect("transformer");
    let raster = elevation_raster(64, 64, bbox::alps_wgs84());

    c.bench_function("compute_footprint_utm33", |b| {
        b.iter(|| compute_footprint(black_box(&raster), &transform))
    });
}

criterion_group!(benches, bench_resample, bench_footprint);
criterion_main!(benches);
