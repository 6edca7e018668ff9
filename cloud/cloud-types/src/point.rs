//! Point and point handle types.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable handle to a point stored in a [`crate::PointCloud`].
///
/// A `PointId` is the point's insertion index. It stays valid for the
/// lifetime of the cloud because points are never removed or reordered.
///
/// # Example
///
/// ```
/// use cloud_types::PointId;
///
/// let id = PointId::new(7);
/// assert_eq!(id.index(), 7);
/// assert_eq!(format!("{id}"), "#7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointId(u32);

impl PointId {
    /// Creates a handle from a raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the handle as a `usize` index into the cloud.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw `u32` value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sample in a point cloud.
///
/// The normal is the zero vector when the source did not provide one.
/// The `active` flag marks whether the point is still eligible for matching
/// during plane extraction; it defaults to `true`.
///
/// # Example
///
/// ```
/// use cloud_types::CloudPoint;
/// use nalgebra::{Point3, Vector3};
///
/// let mut p = CloudPoint::with_normal(Point3::new(1.0, 2.0, 3.0), Vector3::z());
/// assert!(p.is_active());
/// assert!(p.has_normal());
///
/// p.set_active(false);
/// assert!(!p.is_active());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloudPoint {
    /// The 3D position of the point.
    pub position: Point3<f64>,

    /// Normal at this point, zero if unknown.
    pub normal: Vector3<f64>,

    active: bool,
}

impl CloudPoint {
    /// Creates an active point with a zero normal.
    #[must_use]
    pub fn new(position: Point3<f64>) -> Self {
        Self::with_normal(position, Vector3::zeros())
    }

    /// Creates an active point from x, y, z coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_types::CloudPoint;
    ///
    /// let p = CloudPoint::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(p.position.y, 2.0);
    /// assert!(!p.has_normal());
    /// ```
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Creates an active point with a position and a normal.
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal,
            active: true,
        }
    }

    /// Returns true if the point may still be matched.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the point active or inactive.
    #[inline]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns true if the normal is non-zero.
    #[must_use]
    pub fn has_normal(&self) -> bool {
        self.normal != Vector3::zeros()
    }
}

impl Default for CloudPoint {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
