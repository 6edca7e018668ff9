//! End-to-end detection scenarios.
//!
//! Run with: cargo test -p cloud-planes --test scenarios

use std::collections::HashSet;

use cloud_planes::{DetectParams, PlaneDetector, detect_one_plane, detect_planes};
use cloud_types::{PointCloud, PointId};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

// =============================================================================
// Fixtures
// =============================================================================

/// 40 points on the floor `z = 0`, 40 on the wall `x = -1`, then 20 points of
/// uniform noise. The two clusters are orthogonal and do not touch.
fn floor_wall_noise_cloud(seed: u64) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cloud = PointCloud::with_capacity(100);

    for _ in 0..40 {
        cloud.push_coords(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0), 0.0);
    }
    for _ in 0..40 {
        cloud.push_coords(-1.0, rng.gen_range(0.0..10.0), rng.gen_range(1.0..11.0));
    }
    for _ in 0..20 {
        cloud.push_coords(
            rng.gen_range(-1.0..10.0),
            rng.gen_range(-1.0..10.0),
            rng.gen_range(-1.0..10.0),
        );
    }
    cloud
}

/// Replays a fixed list of raw values.
///
/// With `n` a power of two, `gen_range(0..n)` maps `(i as u64) << (64 -
/// log2(n))` to index `i`, so tests can choose every sampled point.
struct ScriptedRng {
    values: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    /// Script that samples the given indices out of eight active points.
    fn picking_of_eight(indices: &[u64]) -> Self {
        Self {
            values: indices.iter().map(|&i| i << 61).collect(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Unit-square corners at `z = 0` (ids 0..4) and at `z = 10` (ids 4..8).
fn two_squares() -> PointCloud {
    let mut cloud = PointCloud::new();
    for z in [0.0, 10.0] {
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            cloud.push_coords(x, y, z);
        }
    }
    cloud
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn floor_and_wall_are_extracted() {
    let mut cloud = floor_wall_noise_cloud(2024);
    let params = DetectParams::new(2, 500, 0.05, 30).with_seed(7);
    let mut detector = PlaneDetector::new(params);

    let planes = detector.detect_planes(&mut cloud);

    assert_eq!(planes.len(), 2);
    let mut seen = HashSet::new();
    for plane in &planes {
        assert!(plane.count() >= 30, "plane with only {} points", plane.count());
        for &id in &plane.points {
            assert!(seen.insert(id), "point {id} matched twice");
        }
    }

    let normals: Vec<_> = planes.iter().map(|p| p.slab.plane().normal).collect();
    assert!(normals.iter().any(|n| n.z.abs() > 0.999));
    assert!(normals.iter().any(|n| n.x.abs() > 0.999));
    assert!(normals[0].dot(&normals[1]).abs() < 1e-3);

    let stats = detector.last_run();
    assert_eq!(stats.planes, 2);
    assert_eq!(stats.index_builds, 2);
    assert_eq!(stats.rounds, 1000);
}

#[test]
fn footprints_cover_their_clusters() {
    let mut cloud = floor_wall_noise_cloud(99);
    let planes = detect_planes(&mut cloud, &DetectParams::new(2, 500, 0.05, 30).with_seed(3));

    for plane in &planes {
        let footprint = plane.slab.footprint();
        assert!(footprint.is_some());
        let (width, height) = footprint.map_or((0.0, 0.0), |f| f.dimensions());
        // Noise points inside the slab may stretch the footprint by up to 1.
        assert!(width > 5.0 && width <= 11.0 + 1e-9, "width {width}");
        assert!(height > 5.0 && height <= 11.0 + 1e-9, "height {height}");
    }
}

#[test]
fn collinear_points_never_qualify() {
    let cloud = PointCloud::from_positions(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(2.0, 2.0, 2.0),
    ])
    .unwrap();
    let found = detect_one_plane(&cloud, &DetectParams::new(1, 100, 0.1, 5).with_seed(1));

    assert_eq!(found.count(), 0);
    assert!(found.slab.is_none());
}

#[test]
fn second_search_sees_deactivated_points() {
    let mut cloud = floor_wall_noise_cloud(5);
    let params = DetectParams::new(1, 500, 0.05, 30).with_seed(13);
    let mut detector = PlaneDetector::new(params);

    let first = detector.detect_one_plane(&cloud);
    assert!(first.count() >= 40);
    for &id in &first.points {
        cloud.set_active(id, false);
    }

    let second = detector.detect_one_plane(&cloud);
    assert!(second.count() >= 40);
    let first_ids: HashSet<PointId> = first.points.iter().copied().collect();
    assert!(second.points.iter().all(|id| !first_ids.contains(id)));
    assert_eq!(detector.last_run().index_builds, 1);
}

#[test]
fn max_planes_bounds_the_run() {
    let mut cloud = floor_wall_noise_cloud(11);
    let planes = detect_planes(&mut cloud, &DetectParams::new(1, 500, 0.05, 30).with_seed(4));
    assert_eq!(planes.len(), 1);
    assert_eq!(cloud.active_count(), 100 - planes[0].count());
}

#[test]
fn equal_count_does_not_replace_incumbent() {
    let cloud = two_squares();
    let params = DetectParams::new(1, 2, 0.1, 0);

    let mut detector = PlaneDetector::with_rng(
        params.clone(),
        ScriptedRng::picking_of_eight(&[0, 1, 2, 4, 5, 6]),
    );
    let found = detector.detect_one_plane(&cloud);
    assert_eq!(found.count(), 4);
    assert_eq!(detector.last_run().improvements, 1);
    let d = found.slab.as_ref().map(|s| s.plane().d().abs());
    assert!(d.is_some_and(|d| d < 1e-12), "kept z = {d:?}");

    let mut detector =
        PlaneDetector::with_rng(params, ScriptedRng::picking_of_eight(&[4, 5, 6, 0, 1, 2]));
    let found = detector.detect_one_plane(&cloud);
    assert_eq!(found.count(), 4);
    let d = found.slab.as_ref().map(|s| s.plane().d().abs());
    assert!(d.is_some_and(|d| (d - 10.0).abs() < 1e-9), "kept z = {d:?}");
}

#[test]
fn larger_candidate_replaces_incumbent() {
    let mut cloud = PointCloud::new();
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
        cloud.push_coords(x, y, 0.0);
    }
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 2.0)] {
        cloud.push_coords(x, y, 10.0);
    }

    let mut detector = PlaneDetector::with_rng(
        DetectParams::new(1, 2, 0.1, 0),
        ScriptedRng::picking_of_eight(&[0, 1, 2, 3, 4, 5]),
    );
    let found = detector.detect_one_plane(&cloud);

    assert_eq!(found.count(), 5);
    assert_eq!(detector.last_run().improvements, 2);
    assert!(found.points.iter().all(|id| id.index() >= 3));
}
