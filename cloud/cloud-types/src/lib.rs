//! Core point cloud types for slab-based plane extraction.
//!
//! This crate provides the data model shared by the loader, the spatial
//! index and the plane detector:
//!
//! - [`CloudPoint`] - A position, a normal and an *active* flag
//! - [`PointId`] - Stable handle into a [`PointCloud`]
//! - [`PointCloud`] - Insertion-ordered arena that owns every point
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`Plane`] - Unit normal plus a point on the plane
//! - [`Slab`] - A plane thickened symmetrically by a tolerance
//!
//! # Point identity
//!
//! Points are never copied out of the cloud for matching. Every consumer
//! (index, sampler, detection results) holds [`PointId`]s, so toggling the
//! active flag through [`PointCloud::set_active`] is observed everywhere.
//!
//! # Example
//!
//! ```
//! use cloud_types::{PointCloud, Slab};
//! use nalgebra::Point3;
//!
//! let cloud = PointCloud::from_positions(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ])
//! .unwrap();
//!
//! let slab = Slab::from_three_points(
//!     &Point3::new(0.0, 0.0, 0.0),
//!     &Point3::new(1.0, 0.0, 0.0),
//!     &Point3::new(0.0, 1.0, 0.0),
//!     0.1,
//! )
//! .unwrap();
//!
//! let inside = cloud.iter().filter(|(_, p)| slab.contains(&p.position)).count();
//! assert_eq!(inside, 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod bounds;
mod cloud;
mod error;
mod plane;
mod point;
mod slab;

pub use bounds::Aabb;
pub use cloud::PointCloud;
pub use error::{CloudError, CloudResult, GeometryError, GeometryResult};
pub use plane::Plane;
pub use point::{CloudPoint, PointId};
pub use slab::{Slab, SlabFootprint};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
