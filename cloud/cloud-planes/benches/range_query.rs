//! Benchmarks for kd-tree slab queries and plane detection.
//!
//! Run with: cargo bench -p cloud-planes
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p cloud-planes -- --save-baseline main
//! 2. After changes: cargo bench -p cloud-planes -- --baseline main

#![allow(missing_docs, clippy::cast_possible_truncation)]

use cloud_planes::{DetectParams, PlaneDetector, PointKdTree};
use cloud_types::{Plane, PointCloud, Slab};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Test Cloud Generation
// =============================================================================

/// A box room: floor, two walls, and 10% uniform clutter.
fn create_room(points_per_surface: usize) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut cloud = PointCloud::with_capacity(points_per_surface * 3 + points_per_surface / 3);

    for _ in 0..points_per_surface {
        cloud.push_coords(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0), 0.0);
        cloud.push_coords(0.0, rng.gen_range(0.0..10.0), rng.gen_range(0.0..3.0));
        cloud.push_coords(rng.gen_range(0.0..10.0), 10.0, rng.gen_range(0.0..3.0));
    }
    for _ in 0..points_per_surface / 3 {
        cloud.push_coords(
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..3.0),
        );
    }
    cloud
}

fn oblique_slab() -> Option<Slab> {
    let plane = Plane::new(Point3::new(5.0, 5.0, 1.5), Vector3::new(0.2, 0.1, 1.0))?;
    Slab::new(plane, 0.05).ok()
}

// =============================================================================
// Range Query Benchmarks
// =============================================================================

fn bench_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("RangeQuery");
    let Some(slab) = oblique_slab() else {
        return;
    };

    for size in [1_000, 10_000, 100_000] {
        let cloud = create_room(size);
        let tree = PointKdTree::build_active(&cloud);
        group.throughput(Throughput::Elements(cloud.len() as u64));

        group.bench_with_input(BenchmarkId::new("kdtree", size), &tree, |b, tree| {
            b.iter(|| tree.range_query(black_box(&slab)));
        });

        group.bench_with_input(BenchmarkId::new("linear", size), &tree, |b, tree| {
            b.iter(|| tree.range_query_linear(black_box(&slab)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("KdTreeBuild");

    for size in [1_000, 10_000, 100_000] {
        let cloud = create_room(size);
        group.throughput(Throughput::Elements(cloud.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &cloud, |b, cloud| {
            b.iter(|| PointKdTree::build_active(black_box(cloud)));
        });
    }

    group.finish();
}

// =============================================================================
// Detection Benchmarks
// =============================================================================

fn bench_detect_planes(c: &mut Criterion) {
    let mut group = c.benchmark_group("DetectPlanes");
    group.sample_size(10); // Each run rebuilds the index per plane

    let cloud = create_room(10_000);
    let params = DetectParams::new(3, 200, 0.05, 1000).with_seed(42);

    group.bench_function("room_30k", |b| {
        b.iter(|| {
            let mut cloud = cloud.clone();
            PlaneDetector::new(params.clone()).detect_planes(black_box(&mut cloud))
        });
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_range_query, bench_build, bench_detect_planes);
criterion_main!(benches);
