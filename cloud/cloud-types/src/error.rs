//! Error types for cloud construction and geometry.

use thiserror::Error;

/// Result type for geometric constructions.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Result type for point cloud construction.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors raised when building planes and slabs.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// The support points are collinear (or coincident), so they span no plane.
    #[error("degenerate plane: support points are collinear")]
    DegeneratePlane,

    /// Slab thickness must be finite and non-negative.
    #[error("invalid slab thickness: {0}")]
    InvalidThickness(f64),
}

/// Errors raised when assembling a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CloudError {
    /// Positions and normals were supplied with different lengths.
    #[error("number of positions ({positions}) != number of normals ({normals})")]
    LengthMismatch {
        /// Number of positions provided.
        positions: usize,
        /// Number of normals provided.
        normals: usize,
    },

    /// The cloud holds more points than a [`crate::PointId`] can address.
    #[error("point cloud too large: {0} points")]
    TooManyPoints(usize),
}
