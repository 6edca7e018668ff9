//! RANSAC plane extraction for unorganized point clouds.
//!
//! This crate finds the dominant planar structures in a
//! [`PointCloud`](cloud_types::PointCloud) by
//! repeatedly sampling point triplets, thickening the plane through them into
//! a [`Slab`](cloud_types::Slab), and counting the points inside the slab with
//! a kd-tree range query. The best slab is extracted, its points are
//! deactivated, and the search repeats on what is left.
//!
//! # Algorithm
//!
//! For each extraction:
//!
//! 1. Build a [`PointKdTree`] over the active points.
//! 2. For `iterations` rounds, sample three active points uniformly with
//!    replacement. Collinear or repeated samples are skipped.
//! 3. Keep the slab whose match count strictly exceeds both `min_points` and
//!    the best count so far. Earlier candidates win ties.
//! 4. Fit the winner's footprint to its points and deactivate them.
//!
//! The run stops after `max_planes` extractions or at the first one that
//! finds nothing.
//!
//! # Example
//!
//! ```
//! use cloud_planes::{detect_planes, DetectParams};
//! use cloud_types::PointCloud;
//!
//! let mut cloud = PointCloud::new();
//! for i in 0..8 {
//!     for j in 0..8 {
//!         cloud.push_coords(f64::from(i), f64::from(j), 0.0); // floor
//!         cloud.push_coords(f64::from(i), 0.5, f64::from(j) + 1.0); // wall
//!     }
//! }
//!
//! let params = DetectParams::new(2, 200, 0.05, 20).with_seed(42);
//! let planes = detect_planes(&mut cloud, &params);
//!
//! assert_eq!(planes.len(), 2);
//! for plane in &planes {
//!     println!("{} points, normal {:?}", plane.count(), plane.slab.plane().normal);
//! }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod detector;
mod error;
mod kdtree;
mod params;
mod result;

pub use detector::{PlaneDetector, detect_one_plane, detect_planes};
pub use error::{DetectError, DetectResult};
pub use kdtree::{DEFAULT_LEAF_SIZE, KdTreeStats, PointKdTree};
pub use params::DetectParams;
pub use result::{DetectedPlane, PlaneMatch, RunStats};
