//! RANSAC plane detection over slab queries.
//!
//! Each extraction builds a [`PointKdTree`] over the currently active points,
//! samples point triplets, and keeps the slab matching the most points. A
//! multi-plane run deactivates every matched point before the next
//! extraction, so no point is attributed to two planes.

use cloud_types::{PointCloud, PointId, Slab};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::error::DetectResult;
use crate::kdtree::PointKdTree;
use crate::params::DetectParams;
use crate::result::{DetectedPlane, PlaneMatch, RunStats};

/// Plane detector owning its parameters and random source.
///
/// # Example
///
/// ```
/// use cloud_planes::{DetectParams, PlaneDetector};
/// use cloud_types::PointCloud;
///
/// let mut cloud = PointCloud::new();
/// for i in 0..6 {
///     for j in 0..6 {
///         cloud.push_coords(f64::from(i), f64::from(j), 0.0);
///     }
/// }
///
/// let params = DetectParams::new(3, 50, 0.01, 10).with_seed(1);
/// let mut detector = PlaneDetector::new(params);
/// let planes = detector.detect_planes(&mut cloud);
///
/// assert_eq!(planes.len(), 1);
/// assert_eq!(planes[0].count(), 36);
/// assert_eq!(cloud.active_count(), 0);
/// ```
#[derive(Debug)]
pub struct PlaneDetector<R = StdRng> {
    params: DetectParams,
    rng: R,
    stats: RunStats,
}

impl PlaneDetector<StdRng> {
    /// Create a detector seeded from `params.seed`, or from entropy when no
    /// seed is set.
    ///
    /// Out-of-range parameters are clamped; see [`Self::try_new`] for the
    /// checked variant.
    #[must_use]
    pub fn new(params: DetectParams) -> Self {
        let rng = params
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(params, rng)
    }

    /// Create a detector after validating the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DetectError::InvalidParameter`] if `params` fails
    /// [`DetectParams::validate`].
    pub fn try_new(params: DetectParams) -> DetectResult<Self> {
        params.validate()?;
        Ok(Self::new(params))
    }
}

impl<R: Rng> PlaneDetector<R> {
    /// Create a detector drawing samples from `rng`.
    ///
    /// `params.seed` is ignored.
    #[must_use]
    pub fn with_rng(params: DetectParams, rng: R) -> Self {
        Self {
            params: params.sanitized(),
            rng,
            stats: RunStats::default(),
        }
    }

    /// Checked variant of [`Self::with_rng`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::DetectError::InvalidParameter`] if `params` fails
    /// [`DetectParams::validate`].
    pub fn try_with_rng(params: DetectParams, rng: R) -> DetectResult<Self> {
        params.validate()?;
        Ok(Self::with_rng(params, rng))
    }

    /// The parameters in effect.
    #[must_use]
    pub const fn params(&self) -> &DetectParams {
        &self.params
    }

    /// Counters from the most recent call to [`Self::detect_one_plane`] or
    /// [`Self::detect_planes`].
    #[must_use]
    pub const fn last_run(&self) -> &RunStats {
        &self.stats
    }

    /// Consumes the detector, returning its random source.
    #[must_use]
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Finds the best slab among the currently active points.
    ///
    /// Active flags are read but never modified. The returned match is empty
    /// when no sampled candidate matched strictly more than
    /// `params.min_points` points.
    pub fn detect_one_plane(&mut self, cloud: &PointCloud) -> PlaneMatch {
        self.stats = RunStats::default();
        let found = self.extract(cloud);
        if found.is_found() {
            self.stats.planes = 1;
        }
        found
    }

    /// Extracts up to `params.max_planes` planes.
    ///
    /// Every point is reactivated first. After each extraction the matched
    /// points are deactivated, so they are left inactive when this returns.
    /// The run stops early at the first extraction that finds nothing.
    pub fn detect_planes(&mut self, cloud: &mut PointCloud) -> Vec<DetectedPlane> {
        self.stats = RunStats::default();
        cloud.set_all_active(true);

        info!(
            points = cloud.len(),
            max_planes = self.params.max_planes,
            iterations = self.params.iterations,
            slab_thickness = self.params.slab_thickness,
            min_points = self.params.min_points,
            "Starting plane detection"
        );

        let mut planes = Vec::new();
        while planes.len() < self.params.max_planes {
            let Some(plane) = self.extract(cloud).into_detected() else {
                break;
            };
            for &id in &plane.points {
                cloud.set_active(id, false);
            }
            planes.push(plane);
        }
        self.stats.planes = planes.len();

        info!(
            planes = planes.len(),
            matched = cloud.len() - cloud.active_count(),
            unmatched = cloud.active_count(),
            rounds = self.stats.rounds,
            degenerate_rounds = self.stats.degenerate_rounds,
            "Plane detection complete"
        );

        planes
    }

    /// One extraction over the active points, accumulating into `self.stats`.
    fn extract(&mut self, cloud: &PointCloud) -> PlaneMatch {
        let active = cloud.active_ids();
        if active.is_empty() {
            debug!("No active points left");
            return PlaneMatch::empty();
        }

        let tree =
            PointKdTree::with_leaf_size(cloud, active.iter().copied(), self.params.leaf_size);
        self.stats.index_builds += 1;

        let mut best: Option<(Slab, Vec<PointId>)> = None;
        let mut best_count = 0;

        for round in 0..self.params.iterations {
            self.stats.rounds += 1;
            let [a, b, c] = self.sample_triplet(&active);

            let slab = match Slab::from_three_points(
                cloud.position(a),
                cloud.position(b),
                cloud.position(c),
                self.params.slab_thickness,
            ) {
                Ok(slab) => slab,
                Err(err) => {
                    self.stats.degenerate_rounds += 1;
                    trace!(round, %a, %b, %c, error = %err, "Skipping degenerate sample");
                    continue;
                }
            };

            let inliers = tree.range_query(&slab);
            let count = inliers.len();
            if count > self.params.min_points && count > best_count {
                trace!(round, count, previous = best_count, "New best candidate");
                best_count = count;
                best = Some((slab, inliers));
                self.stats.improvements += 1;
            }
        }

        let Some((mut slab, points)) = best else {
            debug!(
                active = active.len(),
                min_points = self.params.min_points,
                "No candidate exceeded the point threshold"
            );
            return PlaneMatch::empty();
        };

        slab.update_corners(points.iter().map(|&id| cloud.position(id)));
        let normal = slab.plane().normal;
        debug!(
            count = points.len(),
            active = active.len(),
            normal_x = normal.x,
            normal_y = normal.y,
            normal_z = normal.z,
            offset = slab.plane().d(),
            "Extracted plane"
        );

        PlaneMatch {
            slab: Some(slab),
            points,
        }
    }

    /// Three ids drawn uniformly with replacement. `active` must be non-empty.
    fn sample_triplet(&mut self, active: &[PointId]) -> [PointId; 3] {
        let n = active.len();
        [
            active[self.rng.gen_range(0..n)],
            active[self.rng.gen_range(0..n)],
            active[self.rng.gen_range(0..n)],
        ]
    }
}

/// Find the best slab among the active points of `cloud`.
///
/// Convenience wrapper around [`PlaneDetector::detect_one_plane`].
#[must_use]
pub fn detect_one_plane(cloud: &PointCloud, params: &DetectParams) -> PlaneMatch {
    PlaneDetector::new(params.clone()).detect_one_plane(cloud)
}

/// Extract up to `params.max_planes` disjoint planes from `cloud`.
///
/// Convenience wrapper around [`PlaneDetector::detect_planes`].
pub fn detect_planes(cloud: &mut PointCloud, params: &DetectParams) -> Vec<DetectedPlane> {
    PlaneDetector::new(params.clone()).detect_planes(cloud)
}
