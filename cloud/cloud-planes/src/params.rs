//! Parameters for plane detection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DetectError, DetectResult};
use crate::kdtree::DEFAULT_LEAF_SIZE;

/// Parameters for RANSAC plane detection.
///
/// # Example
///
/// ```
/// use cloud_planes::DetectParams;
///
/// let params = DetectParams::new(2, 500, 0.05, 30).with_seed(7);
/// assert_eq!(params.max_planes, 2);
/// assert_eq!(params.seed, Some(7));
/// assert!(params.validate().is_ok());
///
/// let bad = DetectParams::default().with_slab_thickness(-1.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DetectParams {
    /// Maximum number of planes to extract in one run.
    pub max_planes: usize,

    /// Number of sampled triplets per extraction.
    pub iterations: usize,

    /// Full slab thickness; a point matches if it lies within half of this
    /// from the candidate plane.
    pub slab_thickness: f64,

    /// A candidate must match strictly more points than this to be accepted.
    pub min_points: usize,

    /// Maximum points per kd-tree leaf.
    pub leaf_size: usize,

    /// Optional seed for reproducible results.
    pub seed: Option<u64>,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            max_planes: 5,
            iterations: 1000,
            slab_thickness: 0.02,
            min_points: 100,
            leaf_size: DEFAULT_LEAF_SIZE,
            seed: None,
        }
    }
}

impl DetectParams {
    /// Create params from the four core detection settings.
    #[must_use]
    pub const fn new(
        max_planes: usize,
        iterations: usize,
        slab_thickness: f64,
        min_points: usize,
    ) -> Self {
        Self {
            max_planes,
            iterations,
            slab_thickness,
            min_points,
            leaf_size: DEFAULT_LEAF_SIZE,
            seed: None,
        }
    }

    /// Create params for dense indoor scans.
    ///
    /// Thin slabs (1 cm) and a high acceptance bar, for walls and floors.
    #[must_use]
    pub const fn for_indoor_scan() -> Self {
        Self::new(8, 2000, 0.01, 500)
    }

    /// Create params for small or sparse clouds.
    #[must_use]
    pub const fn for_sparse_cloud() -> Self {
        Self::new(3, 300, 0.05, 10)
    }

    /// Set the maximum number of planes.
    #[must_use]
    pub const fn with_max_planes(mut self, max_planes: usize) -> Self {
        self.max_planes = max_planes;
        self
    }

    /// Set the number of sampled triplets per extraction.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the full slab thickness.
    #[must_use]
    pub const fn with_slab_thickness(mut self, thickness: f64) -> Self {
        self.slab_thickness = thickness;
        self
    }

    /// Set the acceptance threshold.
    #[must_use]
    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Set the kd-tree leaf size.
    #[must_use]
    pub const fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidParameter`] if the slab thickness is
    /// negative or not finite, or the leaf size is zero.
    pub fn validate(&self) -> DetectResult<()> {
        if !self.slab_thickness.is_finite() {
            return Err(DetectError::InvalidParameter {
                name: "slab_thickness",
                reason: format!("must be finite, got {}", self.slab_thickness),
            });
        }
        if self.slab_thickness < 0.0 {
            return Err(DetectError::InvalidParameter {
                name: "slab_thickness",
                reason: format!("must be non-negative, got {}", self.slab_thickness),
            });
        }
        if self.leaf_size == 0 {
            return Err(DetectError::InvalidParameter {
                name: "leaf_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Copy with out-of-range values clamped into range.
    ///
    /// A negative or NaN thickness becomes 0 and an infinite one becomes
    /// `f64::MAX`. A zero leaf size becomes 1.
    #[must_use]
    pub(crate) fn sanitized(&self) -> Self {
        let slab_thickness = if self.slab_thickness.is_nan() {
            0.0
        } else {
            self.slab_thickness.clamp(0.0, f64::MAX)
        };
        Self {
            slab_thickness,
            leaf_size: self.leaf_size.max(1),
            ..self.clone()
        }
    }
}
