//! Detection results and run statistics.

use cloud_types::{PointId, Slab};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a single-plane extraction.
///
/// `slab` is `None` and `points` is empty when no sampled candidate matched
/// strictly more than `min_points` points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneMatch {
    /// The winning slab, with its footprint fitted to `points`.
    pub slab: Option<Slab>,
    /// Points inside the winning slab.
    pub points: Vec<PointId>,
}

impl PlaneMatch {
    /// A match with no plane.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slab: None,
            points: Vec::new(),
        }
    }

    /// Number of matched points (0 when no plane was found).
    #[must_use]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Returns true if a plane was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.slab.is_some()
    }

    /// Converts into a [`DetectedPlane`] if a plane was found.
    #[must_use]
    pub fn into_detected(self) -> Option<DetectedPlane> {
        let slab = self.slab?;
        Some(DetectedPlane {
            slab,
            points: self.points,
        })
    }
}

/// A plane extracted by a multi-plane run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectedPlane {
    /// The extracted slab, footprint included.
    pub slab: Slab,
    /// Points attributed to this plane. Disjoint from every other plane of
    /// the same run.
    pub points: Vec<PointId>,
}

impl DetectedPlane {
    /// Number of points attributed to this plane.
    #[must_use]
    pub fn count(&self) -> usize {
        self.points.len()
    }
}

/// Counters from the most recent detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunStats {
    /// Number of spatial indices built.
    pub index_builds: usize,
    /// Number of sampled triplets, across all extractions.
    pub rounds: usize,
    /// Rounds skipped because the sample did not define a plane.
    pub degenerate_rounds: usize,
    /// Rounds whose candidate replaced the running best.
    pub improvements: usize,
    /// Number of planes extracted.
    pub planes: usize,
}
