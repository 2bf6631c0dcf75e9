#[path = "../util/util.rs"]
mod util;

use util::synthetic_rasters;

use std::time::Duration;

use cartoonette::{
    edges, kmeans,
    median::{self, Border},
    Raster, CLUSTER_COUNT, MAX_ITERATIONS, SEED, THRESHOLD, WINDOW,
};
use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};

fn bench(
    c: &mut Criterion,
    group: &str,
    rasters: &[(String, Raster)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &Raster),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(20)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3));

    for (name, raster) in rasters {
        group.bench_with_input(BenchmarkId::from_parameter(name), raster, &mut f);
    }
}

fn kmeans_segment(c: &mut Criterion) {
    bench(c, "kmeans_segment", synthetic_rasters(), |b, raster| {
        b.iter(|| kmeans::segment(raster, CLUSTER_COUNT, MAX_ITERATIONS, SEED));
    });
}

fn kmeans_segment_par(c: &mut Criterion) {
    bench(c, "kmeans_segment_par", synthetic_rasters(), |b, raster| {
        b.iter(|| kmeans::segment_par(raster, CLUSTER_COUNT, MAX_ITERATIONS, SEED));
    });
}

fn median_filter(c: &mut Criterion) {
    bench(c, "median_filter", synthetic_rasters(), |b, raster| {
        b.iter(|| median::filter(raster, WINDOW, Border::Copy, SEED));
    });
}

fn median_filter_par(c: &mut Criterion) {
    bench(c, "median_filter_par", synthetic_rasters(), |b, raster| {
        b.iter(|| median::filter_par(raster, WINDOW, Border::Copy, SEED));
    });
}

fn edges_detect(c: &mut Criterion) {
    bench(c, "edges_detect", synthetic_rasters(), |b, raster| {
        b.iter(|| edges::detect(raster, THRESHOLD));
    });
}

fn edges_detect_par(c: &mut Criterion) {
    bench(c, "edges_detect_par", synthetic_rasters(), |b, raster| {
        b.iter(|| edges::detect_par(raster, THRESHOLD));
    });
}

fn cartoonize(c: &mut Criterion) {
    bench(c, "cartoonize", synthetic_rasters(), |b, raster| {
        b.iter(|| cartoonette::cartoonize(raster));
    });
}

fn cartoonize_par(c: &mut Criterion) {
    bench(c, "cartoonize_par", synthetic_rasters(), |b, raster| {
        b.iter(|| cartoonette::cartoonize_par(raster));
    });
}

criterion_group!(
    benches,
    kmeans_segment,
    kmeans_segment_par,
    median_filter,
    median_filter_par,
    edges_detect,
    edges_detect_par,
    cartoonize,
    cartoonize_par
);
criterion_main!(benches);
